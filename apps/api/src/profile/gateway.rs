use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::models::profile::ProfileRow;
use crate::profile::models::ProfileDocument;
use crate::profile::validation::{validate_profile, FieldError};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no stored profile for candidate {0}")]
    NotFound(String),

    #[error("profile failed validation ({} field(s))", .0.len())]
    Validation(Vec<FieldError>),

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("stored profile could not be decoded: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Whole-document persistence, keyed by candidate.
///
/// `upsert` validates first and writes nothing when validation fails. Storage may not
/// reject a document that passed validation for content reasons.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn fetch(&self, candidate_id: &str) -> Result<ProfileDocument, GatewayError>;
    async fn upsert(&self, candidate_id: &str, doc: &ProfileDocument) -> Result<(), GatewayError>;
}

pub struct PgProfileGateway {
    pool: PgPool,
}

impl PgProfileGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileGateway for PgProfileGateway {
    async fn fetch(&self, candidate_id: &str) -> Result<ProfileDocument, GatewayError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT candidate_id, document, updated_at FROM candidate_profiles WHERE candidate_id = $1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| GatewayError::NotFound(candidate_id.to_string()))?;
        Ok(serde_json::from_value(row.document)?)
    }

    async fn upsert(&self, candidate_id: &str, doc: &ProfileDocument) -> Result<(), GatewayError> {
        validate_profile(doc).map_err(GatewayError::Validation)?;

        let document = serde_json::to_value(doc)?;
        sqlx::query(
            r#"
            INSERT INTO candidate_profiles (candidate_id, document, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (candidate_id)
            DO UPDATE SET document = EXCLUDED.document, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(candidate_id)
        .bind(&document)
        .execute(&self.pool)
        .await?;

        info!("Persisted profile for candidate {candidate_id}");
        Ok(())
    }
}
