use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::warn;

use crate::profile::models::ProfileDocument;

#[derive(Debug, Error)]
pub enum DraftStoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("draft could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Unsaved working documents. A draft outlives the request that produced it but not
/// the configured TTL.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(&self, candidate_id: &str) -> Result<Option<ProfileDocument>, DraftStoreError>;
    async fn store(&self, candidate_id: &str, doc: &ProfileDocument) -> Result<(), DraftStoreError>;
    async fn discard(&self, candidate_id: &str) -> Result<(), DraftStoreError>;
}

pub fn draft_key(candidate_id: &str) -> String {
    format!("profile:draft:{candidate_id}")
}

pub struct RedisDraftStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisDraftStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl DraftStore for RedisDraftStore {
    async fn load(&self, candidate_id: &str) -> Result<Option<ProfileDocument>, DraftStoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(draft_key(candidate_id)).await?;

        let Some(raw) = raw else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                warn!("Ignoring undecodable draft for candidate {candidate_id}: {e}");
                Ok(None)
            }
        }
    }

    async fn store(&self, candidate_id: &str, doc: &ProfileDocument) -> Result<(), DraftStoreError> {
        let json = serde_json::to_string(doc)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(draft_key(candidate_id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn discard(&self, candidate_id: &str) -> Result<(), DraftStoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(draft_key(candidate_id)).await?;
        Ok(())
    }
}
