//! Edit session: one candidate's working document plus where it came from.
//!
//! ```text
//!   Absent ──(import / edit)──► Draft ──(save ok)──► Persisted
//!                                 ▲                     │
//!                                 └──(import / edit)────┘
//! ```
//!
//! A failed save leaves the session exactly as it was. Discarding the draft reloads
//! from storage (or back to Absent).

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::profile::drafts::{DraftStore, DraftStoreError};
use crate::profile::gateway::{GatewayError, ProfileGateway};
use crate::profile::models::ProfileDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    Absent,
    Draft,
    Persisted,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Drafts(#[from] DraftStoreError),
}

#[derive(Debug, Clone)]
pub struct EditSession {
    candidate_id: String,
    document: ProfileDocument,
    state: DocumentState,
}

impl EditSession {
    pub fn new(candidate_id: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            document: ProfileDocument::default(),
            state: DocumentState::Absent,
        }
    }

    /// Draft if one is pending, else the stored profile, else an empty document.
    pub async fn load(
        candidate_id: &str,
        gateway: &dyn ProfileGateway,
        drafts: &dyn DraftStore,
    ) -> Result<Self, SessionError> {
        if let Some(document) = drafts.load(candidate_id).await? {
            return Ok(Self {
                candidate_id: candidate_id.to_string(),
                document,
                state: DocumentState::Draft,
            });
        }
        Self::load_persisted(candidate_id, gateway).await
    }

    async fn load_persisted(
        candidate_id: &str,
        gateway: &dyn ProfileGateway,
    ) -> Result<Self, SessionError> {
        match gateway.fetch(candidate_id).await {
            Ok(document) => Ok(Self {
                candidate_id: candidate_id.to_string(),
                document,
                state: DocumentState::Persisted,
            }),
            Err(GatewayError::NotFound(_)) => Ok(Self::new(candidate_id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Runs an editor against the working document and commits its result.
    /// On error the session is unchanged.
    pub fn apply<E>(
        &mut self,
        edit: impl FnOnce(&ProfileDocument) -> Result<ProfileDocument, E>,
    ) -> Result<(), E> {
        let next = edit(&self.document)?;
        self.commit(next);
        Ok(())
    }

    pub fn commit(&mut self, next: ProfileDocument) {
        self.document = next;
        self.state = DocumentState::Draft;
    }

    /// Writes the working document to the draft store.
    pub async fn stash(&self, drafts: &dyn DraftStore) -> Result<(), SessionError> {
        drafts.store(&self.candidate_id, &self.document).await?;
        Ok(())
    }

    /// Validates and persists the working document, then clears the pending draft.
    pub async fn save(
        &mut self,
        gateway: &dyn ProfileGateway,
        drafts: &dyn DraftStore,
    ) -> Result<(), SessionError> {
        gateway.upsert(&self.candidate_id, &self.document).await?;
        self.state = DocumentState::Persisted;
        info!("Saved profile for candidate {}", self.candidate_id);

        if let Err(e) = drafts.discard(&self.candidate_id).await {
            warn!(
                "Saved profile but could not clear draft for candidate {}: {e}",
                self.candidate_id
            );
        }
        Ok(())
    }

    /// Drops unsaved work and reloads the last persisted document.
    pub async fn discard_draft(
        &mut self,
        gateway: &dyn ProfileGateway,
        drafts: &dyn DraftStore,
    ) -> Result<(), SessionError> {
        drafts.discard(&self.candidate_id).await?;
        let candidate_id = self.candidate_id.clone();
        *self = Self::load_persisted(&candidate_id, gateway).await?;
        Ok(())
    }
}
