mod config;
mod db;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::ingest::archive::S3ResumeArchive;
use crate::ingest::extractor::PdfTextExtractor;
use crate::ingest::pipeline::IngestPipeline;
use crate::llm_client::LlmClient;
use crate::profile::drafts::RedisDraftStore;
use crate::profile::gateway::PgProfileGateway;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting profile API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (migrations applied here)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.extraction_timeout())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let limits = config.ingest_limits();
    let pipeline = IngestPipeline::new(
        Arc::new(PdfTextExtractor::new(limits.max_pages)),
        Arc::new(llm),
        limits,
    );
    info!(
        "Ingestion limits: {} bytes, {} pages, {}s extraction timeout",
        limits.max_bytes,
        limits.max_pages,
        limits.extraction_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        profiles: Arc::new(PgProfileGateway::new(db)),
        drafts: Arc::new(RedisDraftStore::new(redis, config.draft_ttl_secs)),
        archive: Arc::new(S3ResumeArchive::new(s3, config.s3_bucket.clone())),
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "profile-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
