use std::sync::Arc;

use axum::{extract::Extension, Json};

use trendshelf_infra::dashboard::DashboardSummary;

use crate::app::services::AppServices;

pub async fn dashboard(Extension(services): Extension<Arc<AppServices>>) -> Json<DashboardSummary> {
    Json(services.dashboard())
}
