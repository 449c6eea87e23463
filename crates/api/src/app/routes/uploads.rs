use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::dto::{ProcessedResponse, UploadQuery, UploadsResponse};
use crate::app::errors;
use crate::app::services::AppServices;

/// `POST /api/upload-file?filename=<name>` with the raw file as the body.
pub async fn upload_file(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> axum::response::Response {
    let Some(filename) = query.filename.filter(|f| !f.trim().is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "missing_filename", "filename query parameter is required");
    };
    if body.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "no_file", "No file provided");
    }

    let result = tokio::task::spawn_blocking(move || services.ingest_upload(&filename, &body)).await;
    match result {
        Ok(Ok(count)) => (
            StatusCode::OK,
            Json(ProcessedResponse::new(
                format!("Successfully processed {count} records with AI predictions"),
                count,
            )),
        )
            .into_response(),
        Ok(Err(e)) => errors::ingest_error_to_response(e),
        Err(e) => errors::task_failed(e),
    }
}

/// Re-score the stored books.
pub async fn process_data(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match tokio::task::spawn_blocking(move || services.reprocess()).await {
        Ok(count) => (
            StatusCode::OK,
            Json(ProcessedResponse::new(
                format!("Reprocessed {count} records with AI predictions"),
                count,
            )),
        )
            .into_response(),
        Err(e) => errors::task_failed(e),
    }
}

pub async fn list_uploads(Extension(services): Extension<Arc<AppServices>>) -> Json<UploadsResponse> {
    Json(UploadsResponse {
        uploads: services.recent_uploads(),
    })
}

pub async fn clear_data(Extension(services): Extension<Arc<AppServices>>) -> Json<ProcessedResponse> {
    services.clear();
    Json(ProcessedResponse::new("All data cleared successfully", 0))
}
