//! Document text extraction: PDF bytes to ordered page text.
//!
//! Decoding is CPU-bound and runs inside `tokio::task::spawn_blocking`. A panic inside
//! the decoder surfaces as `DocumentUnreadable` rather than taking the worker down.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::ingest::IngestError;

/// Ordered per-page text of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub pages: Vec<String>,
}

impl ExtractedText {
    /// Wraps decoded pages, rejecting documents without a single readable glyph
    /// (typically scanned images).
    pub fn from_pages(pages: Vec<String>) -> Result<Self, IngestError> {
        let has_text = pages
            .iter()
            .any(|page| page.chars().any(char::is_alphanumeric));
        if !has_text {
            return Err(IngestError::NoExtractableText);
        }
        Ok(Self { pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages concatenated, each preceded by a `--- Page N ---` separator.
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            out.push_str(&format!("--- Page {} ---\n\n", i + 1));
            out.push_str(page.trim());
        }
        out
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<ExtractedText, IngestError>;
}

/// `pdf-extract` backed extractor.
pub struct PdfTextExtractor {
    max_pages: usize,
}

impl PdfTextExtractor {
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Bytes) -> Result<ExtractedText, IngestError> {
        let max_pages = self.max_pages;
        let pages = tokio::task::spawn_blocking(move || decode_pages(&document, max_pages))
            .await
            .map_err(|e| IngestError::DocumentUnreadable(format!("decoder aborted: {e}")))??;
        ExtractedText::from_pages(pages)
    }
}

fn decode_pages(bytes: &[u8], max_pages: usize) -> Result<Vec<String>, IngestError> {
    let doc = pdf_extract::Document::load_mem(bytes)
        .map_err(|e| IngestError::DocumentUnreadable(e.to_string()))?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(IngestError::DocumentUnreadable(
            "document is encrypted".to_string(),
        ));
    }

    let page_count = doc.get_pages().len();
    if page_count == 0 {
        return Err(IngestError::DocumentUnreadable(
            "document has no pages".to_string(),
        ));
    }
    if page_count > max_pages {
        return Err(IngestError::DocumentTooLarge(format!(
            "{page_count} pages (limit {max_pages})"
        )));
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| IngestError::DocumentUnreadable(e.to_string()))?;
    debug!("Decoded {} of {} PDF pages", pages.len(), page_count);
    Ok(pages)
}
