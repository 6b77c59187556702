//! Naive text previews for uploaded files.

/// Number of raw bytes inspected when building a preview.
pub const PREVIEW_BYTES: usize = 1024;

/// Whether a preview should be built for this content type: anything
/// containing "text", or exactly `application/pdf`.
pub fn is_previewable(content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) => ct.contains("text") || ct == "application/pdf",
        None => false,
    }
}

/// Decode the first [`PREVIEW_BYTES`] bytes as UTF-8, dropping invalid
/// sequences (including a character cut off by the byte limit).
pub fn text_preview(content: &[u8]) -> String {
    let head = &content[..content.len().min(PREVIEW_BYTES)];
    let mut out = String::with_capacity(head.len());
    for chunk in head.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Preview for an upload, or `None` when the content type is not previewable.
pub fn preview_for(content_type: Option<&str>, content: &[u8]) -> Option<String> {
    is_previewable(content_type).then(|| text_preview(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previewable_types() {
        assert!(is_previewable(Some("text/plain")));
        assert!(is_previewable(Some("text/csv")));
        assert!(is_previewable(Some("application/pdf")));
        assert!(is_previewable(Some("text/plain; charset=utf-8")));
        assert!(!is_previewable(Some("application/octet-stream")));
        assert!(!is_previewable(Some("image/png")));
        assert!(!is_previewable(Some("application/pdf; x=1")));
        assert!(!is_previewable(None));
    }

    #[test]
    fn test_preview_plain_text() {
        assert_eq!(text_preview(b"hello world"), "hello world");
        assert_eq!(text_preview(b""), "");
    }

    #[test]
    fn test_preview_truncates_to_limit() {
        let content = vec![b'a'; PREVIEW_BYTES + 500];
        let preview = text_preview(&content);
        assert_eq!(preview.len(), PREVIEW_BYTES);
    }

    #[test]
    fn test_preview_drops_invalid_bytes() {
        assert_eq!(text_preview(b"ab\xff\xfecd"), "abcd");
        assert_eq!(text_preview("caf\u{e9}".as_bytes()), "caf\u{e9}");
    }

    #[test]
    fn test_preview_drops_split_character() {
        // 1023 ASCII bytes followed by a 2-byte character straddling the limit
        let mut content = vec![b'x'; PREVIEW_BYTES - 1];
        content.extend_from_slice("\u{e9}".as_bytes());
        let preview = text_preview(&content);
        assert_eq!(preview.len(), PREVIEW_BYTES - 1);
        assert!(preview.chars().all(|c| c == 'x'));
    }

    #[test]
    fn test_preview_for_binary_is_none() {
        assert_eq!(preview_for(Some("application/octet-stream"), b"hello"), None);
        assert_eq!(
            preview_for(Some("text/plain"), b"hello world"),
            Some("hello world".to_string())
        );
    }
}
