// Resume ingestion: PDF bytes -> page text -> extraction service -> parsed sections
// -> reconciled into the candidate's working profile.
// All LLM calls go through llm_client; no direct Anthropic calls here.

pub mod archive;
pub mod extraction;
pub mod extractor;
pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod reconcile;

use thiserror::Error;

/// Failures of the automated ingestion path. Every variant is terminal for that path:
/// nothing is retried, the working document is left as it was, and the caller is
/// offered manual section editing instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("document could not be decoded: {0}")]
    DocumentUnreadable(String),

    #[error("document decoded but contains no extractable text")]
    NoExtractableText,

    #[error("document exceeds configured limits: {0}")]
    DocumentTooLarge(String),

    #[error("extraction service unavailable: {0}")]
    ExtractionServiceUnavailable(String),

    #[error("extraction service rejected credentials or configuration: {0}")]
    ExtractionAuthError(String),

    #[error("extraction output is malformed: {0}")]
    MalformedExtractionOutput(String),

    #[error("ingestion cancelled before reconciliation")]
    Cancelled,
}
