//! Logger module
//!
//! Provides logging utilities for the static server including:
//! - The console banner and stop notice (always stdout)
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::LoggingConfig;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => eprintln!("{message}"),
    }
}

/// Build the startup banner
///
/// Operator tooling scrapes these lines, so the wording is fixed.
pub fn server_banner(port: u16, root: &std::path::Path, entry_page: &str) -> String {
    format!(
        "Server running at http://localhost:{port}/\n\
         Serving files from: {}\n\
         \n\
         To view the game, open:\n\
         \n\
         http://localhost:{port}/{entry_page}\n\
         \n\
         Press Ctrl+C to stop the server",
        root.display()
    )
}

pub fn log_server_start(port: u16, root: &std::path::Path, entry_page: &str) {
    println!("{}", server_banner(port, root, entry_page));
}

/// Printed to stdout once the server has shut down after an interrupt
pub const STOP_MESSAGE: &str = "\nServer stopped.";

pub fn log_server_stopped() {
    println!("{STOP_MESSAGE}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
