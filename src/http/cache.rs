//! HTTP conditional request module
//!
//! Provides `Last-Modified` generation and `If-Modified-Since` handling.
//! Every response also carries `no-store` (see `headers`), so browsers
//! rarely revalidate, but scripted clients still can.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date header value
///
/// Returns `None` for anything that is not a valid RFC 2822 style date,
/// in which case the header is ignored.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Check whether the client's cached copy is still current
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; no `ETag`s are
/// issued here, so its presence alone disables the check.
///
/// # Arguments
/// * `if_modified_since` - Client-sent If-Modified-Since header
/// * `has_if_none_match` - Whether the request carried If-None-Match
/// * `modified` - File modification time
///
/// # Returns
/// Returns true if the response should be 304
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };

    // HTTP dates have one-second resolution
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(
            format_http_date(at(784_111_777)),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_not_modified() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(is_not_modified(Some(header), false, at(784_111_777)));
        assert!(is_not_modified(Some(header), false, at(784_111_000)));
        // Sub-second mtime is truncated before comparing
        let fractional = at(784_111_777) + Duration::from_millis(400);
        assert!(is_not_modified(Some(header), false, fractional));
    }

    #[test]
    fn test_modified() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(!is_not_modified(Some(header), false, at(784_111_778)));
        assert!(!is_not_modified(None, false, at(0)));
        assert!(!is_not_modified(Some("garbage"), false, at(0)));
    }

    #[test]
    fn test_if_none_match_disables_check() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(!is_not_modified(Some(header), true, at(0)));
    }
}
