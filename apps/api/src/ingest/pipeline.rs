use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use crate::ingest::extraction::StructuredExtractor;
use crate::ingest::extractor::TextExtractor;
use crate::ingest::parser::parse_extraction_output;
use crate::ingest::reconcile::reconcile;
use crate::ingest::IngestError;
use crate::profile::models::{PartialProfileDocument, ProfileDocument};

#[derive(Debug, Clone, Copy)]
pub struct IngestLimits {
    pub max_bytes: usize,
    pub max_pages: usize,
    pub extraction_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The reconciled working document.
    pub document: ProfileDocument,
    /// What the extraction recovered, before reconciliation.
    pub partial: PartialProfileDocument,
}

/// PDF bytes -> page text -> one extraction call -> parsed partial -> reconciled document.
pub struct IngestPipeline {
    extractor: Arc<dyn TextExtractor>,
    structurer: Arc<dyn StructuredExtractor>,
    limits: IngestLimits,
}

impl IngestPipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        structurer: Arc<dyn StructuredExtractor>,
        limits: IngestLimits,
    ) -> Self {
        Self {
            extractor,
            structurer,
            limits,
        }
    }

    /// Runs one ingestion against `current`, which is never modified.
    ///
    /// Resolving `cancel` before the extraction reply arrives abandons the run with
    /// `Cancelled`; once parsing starts the run completes.
    pub async fn run<C>(
        &self,
        pdf: Bytes,
        current: &ProfileDocument,
        cancel: C,
    ) -> Result<IngestOutcome, IngestError>
    where
        C: Future<Output = ()> + Send,
    {
        let reply = tokio::select! {
            biased;
            _ = cancel => {
                warn!("Ingestion cancelled before the extraction reply arrived");
                return Err(IngestError::Cancelled);
            }
            reply = self.extract_reply(pdf) => reply?,
        };

        let partial = parse_extraction_output(&reply)?;
        if partial.is_empty() {
            warn!("Extraction reply held no usable sections; document left as it was");
        } else {
            info!("Extraction recovered sections: {:?}", partial.present_sections());
        }

        let document = reconcile(current, &partial);
        Ok(IngestOutcome { document, partial })
    }

    async fn extract_reply(&self, pdf: Bytes) -> Result<String, IngestError> {
        if pdf.len() > self.limits.max_bytes {
            return Err(IngestError::DocumentTooLarge(format!(
                "{} bytes exceeds the {} byte limit",
                pdf.len(),
                self.limits.max_bytes
            )));
        }

        let text = self.extractor.extract(pdf).await?;
        info!("Decoded {} page(s) of resume text", text.page_count());

        let document_text = text.joined();
        match tokio::time::timeout(
            self.limits.extraction_timeout,
            self.structurer.extract_structure(&document_text),
        )
        .await
        {
            Ok(reply) => reply,
            Err(_) => {
                warn!(
                    "Extraction service did not reply within {}s",
                    self.limits.extraction_timeout.as_secs()
                );
                Err(IngestError::ExtractionServiceUnavailable(format!(
                    "no reply within {}s",
                    self.limits.extraction_timeout.as_secs()
                )))
            }
        }
    }
}
