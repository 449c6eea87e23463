use axum::{
    routing::{get, post},
    Router,
};

pub mod books;
pub mod dashboard;
pub mod forecast;
pub mod predict;
pub mod system;
pub mod uploads;

/// Router for the dashboard endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/upload-file", post(uploads::upload_file))
        .route("/process-data", get(uploads::process_data))
        .route("/uploads", get(uploads::list_uploads))
        .route("/clear-data", post(uploads::clear_data))
        .route("/books", get(books::list_books))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/forecast", get(forecast::forecast))
        .route("/predict", post(predict::predict))
}
