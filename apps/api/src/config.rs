use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::ingest::pipeline::IngestLimits;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on one extraction call, including the HTTP request itself.
    pub extraction_timeout_secs: u64,
    pub max_resume_bytes: usize,
    pub max_resume_pages: usize,
    pub draft_ttl_secs: u64,
}

const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_DRAFT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            extraction_timeout_secs: env_or("EXTRACTION_TIMEOUT_SECS", 45)?,
            max_resume_bytes: env_or("MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)?,
            max_resume_pages: env_or("MAX_RESUME_PAGES", 10)?,
            draft_ttl_secs: env_or("DRAFT_TTL_SECS", DEFAULT_DRAFT_TTL_SECS)?,
        })
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    pub fn ingest_limits(&self) -> IngestLimits {
        IngestLimits {
            max_bytes: self.max_resume_bytes,
            max_pages: self.max_resume_pages,
            extraction_timeout: self.extraction_timeout(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
