//! Directory listing module
//!
//! Renders the fallback page for a directory that has no index file.

use crate::http::path::percent_encode_segment;
use std::path::Path;
use tokio::fs;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Target is a directory (symlinks followed)
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Read and sort the entries of `dir`, case-insensitively by name
pub async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Broken symlinks list as plain entries
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path` (already decoded)
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in entries {
        let mut href = percent_encode_segment(&entry.name);
        let mut label = entry.name.clone();
        if entry.is_dir {
            href.push('/');
        }
        // A link marker replaces the directory slash in the label
        if entry.is_symlink {
            label.push('@');
        } else if entry.is_dir {
            label.push('/');
        }
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            href,
            escape_html(&label)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_entries() {
        let html = render(
            "/assets/",
            &[
                entry("gm page.html", false, false),
                entry("textures", true, false),
                entry("latest", true, true),
            ],
        );
        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains(r#"<li><a href="gm%20page.html">gm page.html</a></li>"#));
        assert!(html.contains(r#"<li><a href="textures/">textures/</a></li>"#));
        assert!(html.contains(r#"<li><a href="latest/">latest@</a></li>"#));
    }

    #[test]
    fn test_render_escapes_markup() {
        let html = render("/<x>/", &[entry("a<b>&c.txt", false, false)]);
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains(">a&lt;b&gt;&amp;c.txt</a>"));
        assert!(html.contains(r#"href="a%3Cb%3E%26c.txt""#));
    }

    #[test]
    fn test_render_symlinked_file() {
        let html = render("/", &[entry("current.glb", false, true)]);
        assert!(html.contains(r#"<li><a href="current.glb">current.glb@</a></li>"#));
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.js"), "").unwrap();
        std::fs::write(dir.path().join("A.css"), "").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A.css", "b.js", "c"]);
        assert!(entries[2].is_dir);
        assert!(!entries[0].is_dir);
    }
}
