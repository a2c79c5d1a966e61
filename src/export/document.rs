//! Word-compatible document packaging
//!
//! The exported "Word document" is the rendered HTML wrapped in a minimal
//! `<html><body>` shell and tagged `application/msword`. Word opens such a
//! `.doc` file through its HTML import; no binary DOC structure is produced.

/// MIME type attached to exported documents.
pub const WORD_MIME_TYPE: &str = "application/msword";

/// File name used for downloads unless the user configured another one.
pub const DEFAULT_FILE_NAME: &str = "converted-document.doc";

/// Wrap an HTML fragment in the document shell.
pub fn wrap_document(html_fragment: &str) -> String {
    format!("<html><body>{}</body></html>", html_fragment)
}

/// A packaged document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl DocumentPayload {
    /// Package an HTML fragment as a Word-compatible document.
    pub fn word_document(html_fragment: &str) -> Self {
        Self {
            bytes: wrap_document(html_fragment).into_bytes(),
            mime_type: WORD_MIME_TYPE,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_document() {
        assert_eq!(
            wrap_document("<p>x</p>"),
            "<html><body><p>x</p></body></html>"
        );
        assert_eq!(wrap_document(""), "<html><body></body></html>");
    }

    #[test]
    fn test_word_document_payload() {
        let payload = DocumentPayload::word_document("<h1>Title</h1>");
        assert_eq!(payload.mime_type(), "application/msword");
        assert_eq!(
            payload.bytes(),
            b"<html><body><h1>Title</h1></body></html>".as_slice()
        );
        assert_eq!(payload.len(), payload.bytes().len());
    }
}
