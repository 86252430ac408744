// Listener module
// Binds the TCP listener the accept loop serves from

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Create a `TcpListener` bound to `addr`; port 0 asks the OS for a free port.
///
/// `SO_REUSEADDR` lets a just-stopped server's port be bound again while old
/// connections sit in `TIME_WAIT`. `SO_REUSEPORT` is deliberately left off:
/// a second listener on a port that is still held must fail.
///
/// # Arguments
///
/// * `addr` - The socket address to bind to
///
/// # Returns
///
/// * `Ok(TcpListener)` - Successfully created and bound listener
/// * `Err(std::io::Error)` - Failed to create or bind socket
pub fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // On Windows this flag allows port stealing, so only set it on Unix
    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;

    // Start listening with a backlog queue size of 128
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_port_zero_gives_distinct_ports() {
        let a = create_listener(loopback(0)).unwrap();
        let b = create_listener(loopback(0)).unwrap();
        let port_a = a.local_addr().unwrap().port();
        let port_b = b.local_addr().unwrap().port();
        assert_ne!(port_a, 0);
        assert_ne!(port_b, 0);
        assert_ne!(port_a, port_b);
    }

    #[tokio::test]
    async fn test_held_port_cannot_be_bound_twice() {
        let first = create_listener(loopback(0)).unwrap();
        let addr = first.local_addr().unwrap();

        let err = create_listener(addr).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);

        drop(first);
        assert!(create_listener(addr).is_ok());
    }
}
