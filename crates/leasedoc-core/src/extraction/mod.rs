pub mod pdftotext;

use crate::error::LeaseError;
use serde::{Deserialize, Serialize};

/// Layout-preserving text of a single page.
///
/// `page_index` is 1-based and follows document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_index: usize,
    pub text: String,
}

impl PageText {
    pub fn new(page_index: usize, text: impl Into<String>) -> Self {
        PageText {
            page_index,
            text: text.into(),
        }
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract layout-preserving text from PDF bytes, one PageText per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageText>, LeaseError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Reject input that is not a PDF before handing it to an extractor.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), LeaseError> {
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(());
    }
    let detected = if bytes.is_empty() {
        "empty input".to_string()
    } else if looks_like_text(&bytes[..bytes.len().min(512)]) {
        "text/plain".to_string()
    } else {
        "application/octet-stream".to_string()
    };
    Err(LeaseError::UnsupportedMediaType(detected))
}

fn looks_like_text(prefix: &[u8]) -> bool {
    match std::str::from_utf8(prefix) {
        Ok(_) => true,
        // A multi-byte character cut off by the prefix window is still text.
        Err(e) => e.error_len().is_none(),
    }
}

/// Split form-feed separated layout text (as written by `pdftotext -layout`)
/// into numbered pages.
///
/// The empty page after the final form feed is dropped.
pub fn split_layout_pages(text: &str) -> Vec<PageText> {
    let mut parts: Vec<&str> = text.split('\x0c').collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| p.trim().is_empty()) {
        parts.pop();
    }

    parts
        .into_iter()
        .enumerate()
        .map(|(i, page_text)| PageText::new(i + 1, page_text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_layout_pages() {
        let pages = split_layout_pages("first page\n\x0csecond page\n\x0c");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], PageText::new(1, "first page\n"));
        assert_eq!(pages[1].page_index, 2);
        assert_eq!(pages[1].text, "second page\n");
    }

    #[test]
    fn test_split_layout_pages_without_form_feed() {
        let pages = split_layout_pages("only page");
        assert_eq!(pages, vec![PageText::new(1, "only page")]);
    }

    #[test]
    fn test_ensure_pdf() {
        assert!(ensure_pdf(b"%PDF-1.7\n...").is_ok());
        assert!(matches!(
            ensure_pdf(b"hello"),
            Err(LeaseError::UnsupportedMediaType(ref m)) if m == "text/plain"
        ));
        assert!(matches!(
            ensure_pdf(&[]),
            Err(LeaseError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            ensure_pdf(&[0xff, 0xd8, 0xff, 0xe0]),
            Err(LeaseError::UnsupportedMediaType(ref m)) if m == "application/octet-stream"
        ));
    }
}
