//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: scorer, forecaster and record store behind one handle
//! - `routes/`: HTTP handlers, one file per area
//! - `dto.rs`: request/response shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use trendshelf_infra::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: AppConfig) -> Router {
    build_app_with(Arc::new(services::build_services(&config)))
}

/// Router over already-wired services.
pub fn build_app_with(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
