use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use trendshelf_infra::ingest::IngestError;

pub fn ingest_error_to_response(err: IngestError) -> axum::response::Response {
    match err {
        IngestError::MissingColumn { .. } => {
            json_error(StatusCode::BAD_REQUEST, "missing_column", err.to_string())
        }
        IngestError::UnsupportedFormat(_) => {
            json_error(StatusCode::BAD_REQUEST, "unsupported_format", err.to_string())
        }
        IngestError::Csv(_) | IngestError::Json(_) | IngestError::Excel(_) => {
            json_error(StatusCode::BAD_REQUEST, "malformed_upload", err.to_string())
        }
    }
}

/// Unreadable JSON bodies get the same error shape as everything else.
pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "invalid_json", rejection.body_text())
}

/// A blocking task died before producing a response.
pub fn task_failed(err: tokio::task::JoinError) -> axum::response::Response {
    tracing::error!(error = %err, "blocking task failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "request processing failed")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
