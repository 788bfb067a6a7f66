//! In-memory stand-ins for every external seam, shared by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::Config;
use crate::ingest::archive::{ArchiveError, ResumeArchive};
use crate::ingest::extraction::StructuredExtractor;
use crate::ingest::extractor::{ExtractedText, TextExtractor};
use crate::ingest::pipeline::IngestPipeline;
use crate::ingest::IngestError;
use crate::profile::drafts::{DraftStore, DraftStoreError};
use crate::profile::gateway::{GatewayError, ProfileGateway};
use crate::profile::models::ProfileDocument;
use crate::profile::validation::validate_profile;
use crate::state::AppState;

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/profile_test".to_string(),
        redis_url: "redis://localhost".to_string(),
        s3_bucket: "resumes-test".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        anthropic_api_key: "test".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        extraction_timeout_secs: 45,
        max_resume_bytes: 64 * 1024,
        max_resume_pages: 10,
        draft_ttl_secs: 60,
    }
}

pub struct FakeTextExtractor {
    pages: Result<Vec<String>, IngestError>,
}

impl FakeTextExtractor {
    pub fn pages(pages: Vec<String>) -> Self {
        Self { pages: Ok(pages) }
    }

    pub fn failing(err: IngestError) -> Self {
        Self { pages: Err(err) }
    }
}

#[async_trait]
impl TextExtractor for FakeTextExtractor {
    async fn extract(&self, _document: Bytes) -> Result<ExtractedText, IngestError> {
        ExtractedText::from_pages(self.pages.clone()?)
    }
}

pub struct FakeStructurer {
    reply: Result<String, IngestError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_text: Mutex<Option<String>>,
}

impl FakeStructurer {
    pub fn replying(reply: String) -> Self {
        Self {
            reply: Ok(reply),
            delay: None,
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
        }
    }

    pub fn failing(err: IngestError) -> Self {
        Self {
            reply: Err(err),
            ..Self::replying(String::new())
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredExtractor for FakeStructurer {
    async fn extract_structure(&self, document_text: &str) -> Result<String, IngestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = Some(document_text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

/// Gateway backed by a map. Validates on upsert like the real one.
#[derive(Default)]
pub struct InMemoryGateway {
    profiles: Mutex<HashMap<String, ProfileDocument>>,
}

impl InMemoryGateway {
    pub fn get(&self, candidate_id: &str) -> Option<ProfileDocument> {
        self.profiles.lock().unwrap().get(candidate_id).cloned()
    }

    pub fn put(&self, candidate_id: &str, doc: ProfileDocument) {
        self.profiles
            .lock()
            .unwrap()
            .insert(candidate_id.to_string(), doc);
    }
}

#[async_trait]
impl ProfileGateway for InMemoryGateway {
    async fn fetch(&self, candidate_id: &str) -> Result<ProfileDocument, GatewayError> {
        self.get(candidate_id)
            .ok_or_else(|| GatewayError::NotFound(candidate_id.to_string()))
    }

    async fn upsert(&self, candidate_id: &str, doc: &ProfileDocument) -> Result<(), GatewayError> {
        validate_profile(doc).map_err(GatewayError::Validation)?;
        self.put(candidate_id, doc.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDrafts {
    drafts: Mutex<HashMap<String, ProfileDocument>>,
}

impl InMemoryDrafts {
    pub fn get(&self, candidate_id: &str) -> Option<ProfileDocument> {
        self.drafts.lock().unwrap().get(candidate_id).cloned()
    }

    pub fn put(&self, candidate_id: &str, doc: ProfileDocument) {
        self.drafts
            .lock()
            .unwrap()
            .insert(candidate_id.to_string(), doc);
    }
}

#[async_trait]
impl DraftStore for InMemoryDrafts {
    async fn load(&self, candidate_id: &str) -> Result<Option<ProfileDocument>, DraftStoreError> {
        Ok(self.get(candidate_id))
    }

    async fn store(&self, candidate_id: &str, doc: &ProfileDocument) -> Result<(), DraftStoreError> {
        self.put(candidate_id, doc.clone());
        Ok(())
    }

    async fn discard(&self, candidate_id: &str) -> Result<(), DraftStoreError> {
        self.drafts.lock().unwrap().remove(candidate_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryArchive {
    objects: Mutex<Vec<(String, usize)>>,
}

impl InMemoryArchive {
    pub fn archived(&self) -> Vec<(String, usize)> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeArchive for InMemoryArchive {
    async fn archive(&self, candidate_id: &str, document: Bytes) -> Result<String, ArchiveError> {
        let key = format!("resumes/{candidate_id}/test.pdf");
        self.objects.lock().unwrap().push((key.clone(), document.len()));
        Ok(key)
    }
}

/// Handles to the fakes behind an `AppState`, so tests can seed and inspect them.
pub struct TestHarness {
    pub state: AppState,
    pub profiles: Arc<InMemoryGateway>,
    pub drafts: Arc<InMemoryDrafts>,
    pub archive: Arc<InMemoryArchive>,
    pub structurer: Arc<FakeStructurer>,
}

pub fn harness(extractor: FakeTextExtractor, structurer: FakeStructurer) -> TestHarness {
    let config = test_config();
    let profiles = Arc::new(InMemoryGateway::default());
    let drafts = Arc::new(InMemoryDrafts::default());
    let archive = Arc::new(InMemoryArchive::default());
    let structurer = Arc::new(structurer);
    let pipeline = IngestPipeline::new(
        Arc::new(extractor),
        structurer.clone(),
        config.ingest_limits(),
    );

    let state = AppState {
        profiles: profiles.clone(),
        drafts: drafts.clone(),
        archive: archive.clone(),
        pipeline: Arc::new(pipeline),
        config,
    };

    TestHarness {
        state,
        profiles,
        drafts,
        archive,
        structurer,
    }
}
