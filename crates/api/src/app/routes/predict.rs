use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::dto::{PredictRequest, PredictResponse};
use crate::app::errors;
use crate::app::services::AppServices;

/// Score the posted books without storing them.
pub async fn predict(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    if body.books.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "no_books", "No book data provided");
    }

    let predictions = match tokio::task::spawn_blocking(move || services.predict(&body.books)).await {
        Ok(p) => p,
        Err(e) => return errors::task_failed(e),
    };

    (StatusCode::OK, Json(PredictResponse { predictions })).into_response()
}
