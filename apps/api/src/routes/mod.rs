pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::ingest::handlers as ingest;
use crate::profile::handlers as profile;
use crate::state::AppState;

/// Slack above the configured resume limit for multipart framing; the pipeline enforces
/// the exact limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/profiles/:candidate_id", get(profile::handle_get_profile))
        // Ingestion
        .route(
            "/api/v1/profiles/:candidate_id/resume",
            post(ingest::handle_ingest_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Section editors
        .route(
            "/api/v1/profiles/:candidate_id/sections/:section",
            get(profile::handle_list_section).post(profile::handle_append_entry),
        )
        .route(
            "/api/v1/profiles/:candidate_id/sections/:section/:index",
            patch(profile::handle_update_entry).delete(profile::handle_remove_entry),
        )
        .route(
            "/api/v1/profiles/:candidate_id/career-objective",
            put(profile::handle_set_career_objective),
        )
        .route(
            "/api/v1/profiles/:candidate_id/details",
            patch(profile::handle_update_details),
        )
        // Lifecycle
        .route("/api/v1/profiles/:candidate_id/save", post(profile::handle_save))
        .route(
            "/api/v1/profiles/:candidate_id/draft",
            delete(profile::handle_discard_draft),
        )
        .route(
            "/api/v1/profiles/:candidate_id/completeness",
            get(profile::handle_completeness),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::ingest::IngestError;
    use crate::profile::models::{EducationEntry, ProfileDocument};
    use crate::testing::{harness, FakeStructurer, FakeTextExtractor, TestHarness};

    const BOUNDARY: &str = "profile-api-test-boundary";

    fn extraction_reply() -> String {
        r#"Here is the data: {"education":[{"institution":"VIT","degree":"B.Tech"}],"skills":["Python"]}"#
            .to_string()
    }

    fn default_harness() -> TestHarness {
        harness(
            FakeTextExtractor::pages(vec!["VIT B.Tech".to_string(), "Python".to_string()]),
            FakeStructurer::replying(extraction_reply()),
        )
    }

    fn upload(candidate_id: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/profiles/{candidate_id}/resume"))
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let h = default_harness();
        let response = build_router(h.state)
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "profile-api");
    }

    #[tokio::test]
    async fn test_resume_upload_reconciles_into_draft() {
        let h = default_harness();
        let mut stored = ProfileDocument::default().set_career_objective("Backend roles");
        stored.education.push(EducationEntry {
            institution: "Old School".to_string(),
            ..Default::default()
        });
        h.profiles.put("c1", stored);

        let response = build_router(h.state.clone())
            .oneshot(upload("c1", b"%PDF-1.7\n%fake body"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["state"], "draft");
        assert_eq!(body["updated_sections"], json!(["education", "skills"]));
        assert_eq!(body["document"]["education"][0]["institution"], "VIT");
        assert_eq!(body["document"]["skills"], json!([{"name": "Python"}]));
        assert_eq!(body["document"]["career_objective"], "Backend roles");

        let draft = h.drafts.get("c1").unwrap();
        assert_eq!(draft.education[0].institution, "VIT");
        // Nothing is persisted until save.
        assert_eq!(h.profiles.get("c1").unwrap().education[0].institution, "Old School");

        for _ in 0..10 {
            if !h.archive.archived().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(h.archive.archived().len(), 1);
    }

    #[tokio::test]
    async fn test_non_pdf_upload_rejected_before_extraction() {
        let h = default_harness();
        let response = build_router(h.state.clone())
            .oneshot(upload("c1", b"PK\x03\x04 this is a zip"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.structurer.calls(), 0);
    }

    #[tokio::test]
    async fn test_scanned_upload_falls_back_to_manual_entry() {
        let h = harness(
            FakeTextExtractor::failing(IngestError::NoExtractableText),
            FakeStructurer::replying(extraction_reply()),
        );
        let response = build_router(h.state.clone())
            .oneshot(upload("c1", b"%PDF-1.7\n%scanned"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NO_EXTRACTABLE_TEXT");
        assert_eq!(body["error"]["fallback"], "manual_entry");
        assert!(h.drafts.get("c1").is_none());
        assert_eq!(h.structurer.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extraction_timeout_offers_manual_entry_and_keeps_draft() {
        let h = harness(
            FakeTextExtractor::pages(vec!["VIT B.Tech".to_string()]),
            FakeStructurer::replying(extraction_reply()).delayed(Duration::from_secs(600)),
        );
        let stored = ProfileDocument::default().set_career_objective("stored");
        let draft = ProfileDocument::default().set_career_objective("draft in progress");
        h.profiles.put("c8", stored.clone());
        h.drafts.put("c8", draft.clone());

        let response = build_router(h.state.clone())
            .oneshot(upload("c8", b"%PDF-1.7\n%slow service"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EXTRACTION_SERVICE_UNAVAILABLE");
        assert_eq!(body["error"]["fallback"], "manual_entry");
        assert_eq!(h.structurer.calls(), 1);
        assert_eq!(h.drafts.get("c8"), Some(draft));
        assert_eq!(h.profiles.get("c8"), Some(stored));
    }

    #[tokio::test]
    async fn test_malformed_template_is_rejected_without_a_draft() {
        let h = default_harness();
        let app = build_router(h.state.clone());

        let truncated = Request::builder()
            .method("POST")
            .uri("/api/v1/profiles/c9/sections/skills")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "#))
            .unwrap();
        let response = app.clone().oneshot(truncated).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");

        let array = json_request("POST", "/api/v1/profiles/c9/sections/skills", json!(["Rust"]));
        let response = app.clone().oneshot(array).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let plain_text = Request::builder()
            .method("POST")
            .uri("/api/v1/profiles/c9/sections/skills")
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"name": "Rust"}"#))
            .unwrap();
        let response = app.oneshot(plain_text).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(h.drafts.get("c9").is_none());
    }

    #[tokio::test]
    async fn test_empty_body_appends_default_entry() {
        let h = default_harness();
        let response = build_router(h.state.clone())
            .oneshot(empty_request("POST", "/api/v1/profiles/c10/sections/education"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["index"], 0);
        assert_eq!(h.drafts.get("c10").unwrap().education.len(), 1);
    }

    #[tokio::test]
    async fn test_manual_entry_then_save() {
        let h = default_harness();
        let app = build_router(h.state.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/profiles/c2/sections/skills",
                json!({"name": "Rust"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["index"], 0);
        assert_eq!(body["state"], "draft");

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                "/api/v1/profiles/c2/details",
                json!({"field": "first_name", "value": "Asha"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/v1/profiles/c2/save"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["state"], "persisted");

        let saved = h.profiles.get("c2").unwrap();
        assert_eq!(saved.skills[0].name, "Rust");
        assert_eq!(saved.profile_details.first_name, "Asha");
        assert!(h.drafts.get("c2").is_none());
    }

    #[tokio::test]
    async fn test_stale_index_is_conflict() {
        let h = default_harness();
        let response = build_router(h.state)
            .oneshot(json_request(
                "PATCH",
                "/api/v1/profiles/c3/sections/education/2",
                json!({"field": "degree", "value": "M.Tech"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "INDEX_OUT_OF_RANGE");
    }

    #[tokio::test]
    async fn test_invalid_enum_value_rejected_by_editor() {
        let h = default_harness();
        let app = build_router(h.state.clone());
        app.clone()
            .oneshot(empty_request("POST", "/api/v1/profiles/c4/sections/work_experiences"))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "PATCH",
                "/api/v1/profiles/c4/sections/work_experiences/0",
                json!({"field": "location_type", "value": "Moon"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_FIELD_VALUE");
    }

    #[tokio::test]
    async fn test_save_reports_field_errors_and_keeps_draft() {
        let h = default_harness();
        let app = build_router(h.state.clone());
        app.clone()
            .oneshot(empty_request("POST", "/api/v1/profiles/c5/sections/skills"))
            .await
            .unwrap();

        let response = app
            .oneshot(empty_request("POST", "/api/v1/profiles/c5/save"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["fields"][0]["field"], "skills[0].name");
        assert!(h.profiles.get("c5").is_none());
        assert!(h.drafts.get("c5").is_some());
    }

    #[tokio::test]
    async fn test_discard_draft_restores_persisted_document() {
        let h = default_harness();
        let stored = ProfileDocument::default().set_career_objective("stored");
        h.profiles.put("c6", stored);
        h.drafts
            .put("c6", ProfileDocument::default().set_career_objective("draft"));

        let response = build_router(h.state.clone())
            .oneshot(empty_request("DELETE", "/api/v1/profiles/c6/draft"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["state"], "persisted");
        assert_eq!(body["document"]["career_objective"], "stored");
    }

    #[tokio::test]
    async fn test_completeness_for_new_candidate() {
        let h = default_harness();
        let response = build_router(h.state)
            .oneshot(empty_request("GET", "/api/v1/profiles/c7/completeness"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["overall_score"], 0.0);
    }
}
