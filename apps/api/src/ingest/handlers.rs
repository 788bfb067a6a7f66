use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::ingest::IngestError;
use crate::profile::handlers::{load_session, ProfileResponse};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    /// Sections the extraction recovered and replaced in the working document.
    pub updated_sections: Vec<&'static str>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Ingest(IngestError::DocumentTooLarge(e.body_text()))
    } else {
        AppError::Validation(e.body_text())
    }
}

async fn read_resume(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(RESUME_FIELD) {
            return field.bytes().await.map_err(multipart_error);
        }
    }
    Err(AppError::Validation(format!(
        "multipart field '{RESUME_FIELD}' is required"
    )))
}

/// POST /api/v1/profiles/:candidate_id/resume
///
/// Decodes the uploaded PDF, extracts structured sections and reconciles them into the
/// candidate's working document, which is stashed as a draft. Nothing is persisted
/// until the candidate saves.
pub async fn handle_ingest_resume(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    let pdf = read_resume(multipart).await?;

    if infer::get(&pdf).map(|kind| kind.mime_type()) != Some("application/pdf") {
        return Err(AppError::Validation(
            "resume must be a PDF document".to_string(),
        ));
    }
    info!(
        "Received resume for candidate {candidate_id} ({} bytes)",
        pdf.len()
    );

    let archive = state.archive.clone();
    let archive_id = candidate_id.clone();
    let archive_bytes = pdf.clone();
    tokio::spawn(async move {
        if let Err(e) = archive.archive(&archive_id, archive_bytes).await {
            warn!("Resume archive failed for candidate {archive_id}: {e}");
        }
    });

    let mut session = load_session(&state, &candidate_id).await?;
    // A dropped request future abandons the run; there is no other cancel source here.
    let outcome = state
        .pipeline
        .run(pdf, session.document(), std::future::pending())
        .await?;

    session.commit(outcome.document);
    session.stash(state.drafts.as_ref()).await?;

    Ok(Json(IngestResponse {
        profile: ProfileResponse::from(&session),
        updated_sections: outcome.partial.present_sections(),
    }))
}
