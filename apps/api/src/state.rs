use std::sync::Arc;

use crate::config::Config;
use crate::ingest::archive::ResumeArchive;
use crate::ingest::pipeline::IngestPipeline;
use crate::profile::drafts::DraftStore;
use crate::profile::gateway::ProfileGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileGateway>,
    /// Unsaved working documents between requests.
    pub drafts: Arc<dyn DraftStore>,
    pub archive: Arc<dyn ResumeArchive>,
    pub pipeline: Arc<IngestPipeline>,
    pub config: Config,
}
