//! Directory listing generation
//!
//! Renders a plain HTML index for directories with no index file. Names
//! are HTML-escaped for display and percent-encoded in hrefs, so files
//! with spaces or markup characters in their names stay harmless.

use std::io;
use std::path::Path;
use tokio::fs;

/// One row in a directory listing
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read a directory and return its entries sorted by name.
pub async fn collect_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await?;
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        entries.push(ListingEntry { name, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Render the listing page for a request path.
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = html_escape(display_path);
    let mut items = String::new();
    for entry in entries {
        let slash = if entry.is_dir { "/" } else { "" };
        items.push_str(&format!(
            "        <li><a href=\"{href}{slash}\">{label}{slash}</a></li>\n",
            href = percent_encode(&entry.name),
            label = html_escape(&entry.name),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Directory listing for {title}</title>
</head>
<body>
    <h1>Directory listing for {title}</h1>
    <hr>
    <ul>
{items}    </ul>
    <hr>
</body>
</html>"#
    )
}

/// Escape characters with meaning in HTML text and attribute values.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode a path segment for use in an href.
fn percent_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for &byte in segment.as_bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
        }
    }

    #[test]
    fn test_directories_get_trailing_slash() {
        let html = render("/", &[entry("pkg", true), entry("app.js", false)]);
        assert!(html.contains("<a href=\"pkg/\">pkg/</a>"));
        assert!(html.contains("<a href=\"app.js\">app.js</a>"));
    }

    #[test]
    fn test_names_are_html_escaped() {
        let html = render("/", &[entry("<script>.txt", false)]);
        assert!(!html.contains("<script>.txt"));
        assert!(html.contains("&lt;script&gt;.txt"));
    }

    #[test]
    fn test_hrefs_are_percent_encoded() {
        let html = render("/", &[entry("hello world.txt", false)]);
        assert!(html.contains("href=\"hello%20world.txt\""));
        assert!(html.contains(">hello world.txt<"));
    }

    #[test]
    fn test_title_uses_request_path() {
        let html = render("/assets/", &[]);
        assert!(html.contains("Directory listing for /assets/"));
    }

    #[test]
    fn test_percent_encode_keeps_unreserved() {
        assert_eq!(percent_encode("file-1.2_3~x"), "file-1.2_3~x");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a?b"), "a%3Fb");
    }
}
