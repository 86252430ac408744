//! Request path sanitizing module
//!
//! Turns the path component of a request URI into filesystem segments that
//! can be joined onto the serving root without escaping it.

/// Request path split into safe segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath {
    /// Decoded segments, never empty, `.` or `..`
    pub segments: Vec<String>,
    /// Whether the decoded path ended with `/`
    pub trailing_slash: bool,
}

impl SafePath {
    /// Parse the path component of a request URI
    ///
    /// # Examples
    /// ```ignore
    /// let p = SafePath::parse("/assets/../gm%20page.html");
    /// assert_eq!(p.segments, vec!["assets", "gm page.html"]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        // Raw targets from non-browser clients may still carry these.
        let raw = raw.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode(raw);

        let segments = decoded
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .filter(|s| !s.contains('\\') && !s.contains('\0'))
            .map(ToString::to_string)
            .collect();

        Self {
            segments,
            trailing_slash: decoded.ends_with('/'),
        }
    }

    /// Join the segments onto `root`
    pub fn join_onto(&self, root: &std::path::Path) -> std::path::PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.segments);
        path
    }
}

/// Decode `%XX` escapes; malformed escapes are kept literally
///
/// Invalid UTF-8 in the decoded bytes is replaced, which can only make the
/// lookup miss.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Encode a single path segment for use in an `href`
pub fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(b));
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_plain_path() {
        let p = SafePath::parse("/gm.html");
        assert_eq!(p.segments, vec!["gm.html"]);
        assert!(!p.trailing_slash);
    }

    #[test]
    fn test_root_path() {
        let p = SafePath::parse("/");
        assert!(p.segments.is_empty());
        assert!(p.trailing_slash);
    }

    #[test]
    fn test_dot_segments_dropped() {
        let p = SafePath::parse("/../../etc/./passwd");
        assert_eq!(p.segments, vec!["etc", "passwd"]);

        let p = SafePath::parse("/%2e%2e/%2E%2E/secret");
        assert_eq!(p.segments, vec!["secret"]);
    }

    #[test]
    fn test_encoded_separators_split() {
        let p = SafePath::parse("/a%2F..%2Fb");
        assert_eq!(p.segments, vec!["a", "b"]);
    }

    #[test]
    fn test_backslash_and_nul_dropped() {
        let p = SafePath::parse("/..%5C..%5Cwin.ini/x%00y/ok");
        assert_eq!(p.segments, vec!["ok"]);
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        let p = SafePath::parse("/textures/albedo.png?v=3#top");
        assert_eq!(p.segments, vec!["textures", "albedo.png"]);
        assert!(!p.trailing_slash);
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("gm%20page.html"), "gm page.html");
        assert_eq!(percent_decode("%E2%9C%93"), "\u{2713}");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%4"), "%4");
    }

    #[test]
    fn test_percent_encode_segment() {
        assert_eq!(percent_encode_segment("gm page.html"), "gm%20page.html");
        assert_eq!(percent_encode_segment("a&b"), "a%26b");
        assert_eq!(percent_encode_segment("plain-name_1.txt"), "plain-name_1.txt");
    }

    #[test]
    fn test_join_onto() {
        let p = SafePath::parse("/assets/textures/normal.png");
        assert_eq!(
            p.join_onto(Path::new("/srv")),
            Path::new("/srv/assets/textures/normal.png")
        );
    }
}
