//! Structured extraction client: one request per submitted document.
//!
//! The reply is returned as raw text. It is untrusted until `parser` has located,
//! decoded and normalized the JSON object inside it.

use async_trait::async_trait;
use tracing::{error, info};

use crate::ingest::prompts::{RESUME_EXTRACTION_PROMPT, RESUME_EXTRACTION_SYSTEM};
use crate::ingest::IngestError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INFERENCE_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};

#[async_trait]
pub trait StructuredExtractor: Send + Sync {
    /// Sends `document_text` with the fixed schema description; returns the raw reply.
    async fn extract_structure(&self, document_text: &str) -> Result<String, IngestError>;
}

impl From<LlmError> for IngestError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => IngestError::MalformedExtractionOutput(
                "reply contained no text block".to_string(),
            ),
            e if e.is_transient() => IngestError::ExtractionServiceUnavailable(e.to_string()),
            e => IngestError::ExtractionAuthError(e.to_string()),
        }
    }
}

pub fn build_prompt(document_text: &str) -> String {
    RESUME_EXTRACTION_PROMPT.replace("{document_text}", document_text)
}

pub fn build_system() -> String {
    [
        RESUME_EXTRACTION_SYSTEM,
        JSON_ONLY_SYSTEM,
        NO_INFERENCE_INSTRUCTION,
    ]
    .join("\n\n")
}

#[async_trait]
impl StructuredExtractor for LlmClient {
    async fn extract_structure(&self, document_text: &str) -> Result<String, IngestError> {
        let prompt = build_prompt(document_text);
        match self.call_text(&prompt, &build_system()).await {
            Ok(reply) => {
                info!("Extraction service replied with {} chars", reply.len());
                Ok(reply)
            }
            Err(e) => {
                let err = IngestError::from(e);
                if matches!(err, IngestError::ExtractionAuthError(_)) {
                    error!("Extraction service configuration error: {err}");
                }
                Err(err)
            }
        }
    }
}
