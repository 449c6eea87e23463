use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};

use crate::app::dto::{ForecastQuery, ForecastResponse};
use crate::app::services::AppServices;

/// `GET /api/forecast?category=`; a blank category charts every book.
pub async fn forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ForecastQuery>,
) -> Json<ForecastResponse> {
    let (forecast, categories) = services.forecast(query.category.as_deref());
    Json(ForecastResponse { forecast, categories })
}
