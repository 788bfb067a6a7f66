use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::profile::drafts::DraftStoreError;
use crate::profile::gateway::GatewayError;
use crate::profile::sections::SectionError;
use crate::profile::session::SessionError;
use crate::profile::validation::FieldError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Profile failed validation")]
    FieldValidation(Vec<FieldError>),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Section edit rejected: {0}")]
    Section(#[from] SectionError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(id) => AppError::NotFound(format!("No profile for candidate {id}")),
            GatewayError::Validation(fields) => AppError::FieldValidation(fields),
            e => AppError::Storage(e.to_string()),
        }
    }
}

impl From<DraftStoreError> for AppError {
    fn from(err: DraftStoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Gateway(e) => e.into(),
            SessionError::Drafts(e) => e.into(),
        }
    }
}

fn ingest_status(err: &IngestError) -> (StatusCode, &'static str) {
    match err {
        IngestError::DocumentUnreadable(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "DOCUMENT_UNREADABLE")
        }
        IngestError::NoExtractableText => (StatusCode::UNPROCESSABLE_ENTITY, "NO_EXTRACTABLE_TEXT"),
        IngestError::DocumentTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "DOCUMENT_TOO_LARGE"),
        IngestError::ExtractionServiceUnavailable(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "EXTRACTION_SERVICE_UNAVAILABLE",
        ),
        IngestError::ExtractionAuthError(_) => (StatusCode::BAD_GATEWAY, "EXTRACTION_AUTH_ERROR"),
        IngestError::MalformedExtractionOutput(_) => {
            (StatusCode::BAD_GATEWAY, "MALFORMED_EXTRACTION_OUTPUT")
        }
        IngestError::Cancelled => (StatusCode::CONFLICT, "INGESTION_CANCELLED"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::FieldValidation(fields) => {
                let body = Json(json!({
                    "error": {
                        "code": "PROFILE_INVALID",
                        "message": self.to_string(),
                        "fields": fields,
                    }
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::Ingest(e) => {
                let (status, code) = ingest_status(e);
                if status.is_server_error() {
                    tracing::error!("Ingestion error: {e}");
                } else {
                    tracing::warn!("Ingestion rejected: {e}");
                }
                // Every ingestion failure leaves manual section editing available.
                let body = Json(json!({
                    "error": {
                        "code": code,
                        "message": e.to_string(),
                        "fallback": "manual_entry",
                    }
                }));
                return (status, body).into_response();
            }
            AppError::Section(e) => {
                let code = match e {
                    SectionError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
                    SectionError::UnknownField { .. } => "UNKNOWN_FIELD",
                    SectionError::InvalidFieldValue { .. } => "INVALID_FIELD_VALUE",
                };
                let status = match e {
                    SectionError::IndexOutOfRange { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, code, e.to_string())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_errors_offer_manual_entry() {
        let response = AppError::Ingest(IngestError::NoExtractableText).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NO_EXTRACTABLE_TEXT");
        assert_eq!(body["error"]["fallback"], "manual_entry");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (
                AppError::Ingest(IngestError::ExtractionServiceUnavailable("t".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Ingest(IngestError::DocumentTooLarge("big".into())),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                AppError::Ingest(IngestError::ExtractionAuthError("key".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Section(SectionError::IndexOutOfRange {
                    scope: "skills",
                    index: 4,
                    len: 1,
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Section(SectionError::UnknownField {
                    scope: "skills",
                    field: "level".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Storage("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_field_validation_lists_fields() {
        let response = AppError::FieldValidation(vec![FieldError {
            field: "skills[0].name".to_string(),
            message: "is required".to_string(),
        }])
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["fields"][0]["field"], "skills[0].name");
    }

    #[test]
    fn test_gateway_not_found_maps_to_not_found() {
        let err = AppError::from(GatewayError::NotFound("c9".to_string()));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
