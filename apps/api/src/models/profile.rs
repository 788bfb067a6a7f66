use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// One row of `candidate_profiles`. `document` holds the whole profile as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub candidate_id: String,
    pub document: Value,
    pub updated_at: DateTime<Utc>,
}
