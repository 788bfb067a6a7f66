use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::AppError;
use crate::profile::completeness::{compute_completeness_report, CompletenessReport};
use crate::profile::models::ProfileDocument;
use crate::profile::sections::Section;
use crate::profile::session::{DocumentState, EditSession};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub state: DocumentState,
    pub document: ProfileDocument,
}

impl From<&EditSession> for ProfileResponse {
    fn from(session: &EditSession) -> Self {
        Self {
            state: session.state(),
            document: session.document().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppendResponse {
    pub index: usize,
    #[serde(flatten)]
    pub profile: ProfileResponse,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct CareerObjectiveUpdate {
    #[serde(default)]
    pub career_objective: Option<String>,
}

pub async fn load_session(state: &AppState, candidate_id: &str) -> Result<EditSession, AppError> {
    Ok(EditSession::load(candidate_id, state.profiles.as_ref(), state.drafts.as_ref()).await?)
}

/// Applies one editor to the candidate's session and stashes the result as a draft.
async fn edit<E>(
    state: &AppState,
    candidate_id: &str,
    editor: impl FnOnce(&ProfileDocument) -> Result<ProfileDocument, E>,
) -> Result<Json<ProfileResponse>, AppError>
where
    AppError: From<E>,
{
    let mut session = load_session(state, candidate_id).await?;
    session.apply(editor)?;
    session.stash(state.drafts.as_ref()).await?;
    Ok(Json(ProfileResponse::from(&session)))
}

/// GET /api/v1/profiles/:candidate_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let session = load_session(&state, &candidate_id).await?;
    Ok(Json(ProfileResponse::from(&session)))
}

/// GET /api/v1/profiles/:candidate_id/sections/:section
pub async fn handle_list_section(
    State(state): State<AppState>,
    Path((candidate_id, section)): Path<(String, Section)>,
) -> Result<Json<Value>, AppError> {
    let session = load_session(&state, &candidate_id).await?;
    let entries = session.document().list_entries(section);
    Ok(Json(json!({
        "section": section,
        "count": entries.len(),
        "entries": entries,
    })))
}

/// An absent or blank body means "all defaults". Anything else must be a JSON object.
fn parse_template(headers: &HeaderMap, body: &Bytes) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"));
    if !is_json {
        return Err(AppError::Validation(
            "entry template must be sent as application/json".to_string(),
        ));
    }

    Json::<Map<String, Value>>::from_bytes(body)
        .map(|Json(template)| template)
        .map_err(|e| AppError::Validation(format!("invalid entry template: {}", e.body_text())))
}

/// POST /api/v1/profiles/:candidate_id/sections/:section
pub async fn handle_append_entry(
    State(state): State<AppState>,
    Path((candidate_id, section)): Path<(String, Section)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AppendResponse>, AppError> {
    let template = parse_template(&headers, &body)?;

    let mut session = load_session(&state, &candidate_id).await?;
    let (next, index) = session.document().append_entry(section, &template)?;
    session.commit(next);
    session.stash(state.drafts.as_ref()).await?;

    Ok(Json(AppendResponse {
        index,
        profile: ProfileResponse::from(&session),
    }))
}

/// PATCH /api/v1/profiles/:candidate_id/sections/:section/:index
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((candidate_id, section, index)): Path<(String, Section, usize)>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    edit(&state, &candidate_id, |doc| {
        doc.update_entry(section, index, &req.field, &req.value)
    })
    .await
}

/// DELETE /api/v1/profiles/:candidate_id/sections/:section/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((candidate_id, section, index)): Path<(String, Section, usize)>,
) -> Result<Json<ProfileResponse>, AppError> {
    edit(&state, &candidate_id, |doc| doc.remove_entry(section, index)).await
}

/// PUT /api/v1/profiles/:candidate_id/career-objective
pub async fn handle_set_career_objective(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    Json(req): Json<CareerObjectiveUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let objective = req.career_objective.unwrap_or_default();
    edit(&state, &candidate_id, |doc| {
        Ok::<_, AppError>(doc.set_career_objective(&objective))
    })
    .await
}

/// PATCH /api/v1/profiles/:candidate_id/details
pub async fn handle_update_details(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    edit(&state, &candidate_id, |doc| doc.update_detail(&req.field, &req.value)).await
}

/// POST /api/v1/profiles/:candidate_id/save
pub async fn handle_save(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut session = load_session(&state, &candidate_id).await?;
    session
        .save(state.profiles.as_ref(), state.drafts.as_ref())
        .await?;
    Ok(Json(ProfileResponse::from(&session)))
}

/// DELETE /api/v1/profiles/:candidate_id/draft
pub async fn handle_discard_draft(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut session = load_session(&state, &candidate_id).await?;
    session
        .discard_draft(state.profiles.as_ref(), state.drafts.as_ref())
        .await?;
    Ok(Json(ProfileResponse::from(&session)))
}

/// GET /api/v1/profiles/:candidate_id/completeness
pub async fn handle_completeness(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<CompletenessReport>, AppError> {
    let session = load_session(&state, &candidate_id).await?;
    Ok(Json(compute_completeness_report(session.document())))
}
