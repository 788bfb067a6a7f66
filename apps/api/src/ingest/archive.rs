use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("S3 upload failed: {0}")]
    Upload(String),
}

/// Keeps a copy of every uploaded resume. Failures never block ingestion.
#[async_trait]
pub trait ResumeArchive: Send + Sync {
    /// Stores the document and returns its object key.
    async fn archive(&self, candidate_id: &str, document: Bytes) -> Result<String, ArchiveError>;
}

pub struct S3ResumeArchive {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeArchive {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

pub fn object_key(candidate_id: &str, upload_id: Uuid) -> String {
    format!("resumes/{candidate_id}/{upload_id}.pdf")
}

#[async_trait]
impl ResumeArchive for S3ResumeArchive {
    async fn archive(&self, candidate_id: &str, document: Bytes) -> Result<String, ArchiveError> {
        let key = object_key(candidate_id, Uuid::new_v4());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(document.to_vec()))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| ArchiveError::Upload(e.to_string()))?;

        info!("Archived resume to s3://{}/{}", self.bucket, key);
        Ok(key)
    }
}
