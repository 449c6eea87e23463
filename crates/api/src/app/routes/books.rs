use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};

use trendshelf_infra::read_model::BookFilter;

use crate::app::dto::{BookResponse, BooksResponse};
use crate::app::services::AppServices;

/// `GET /api/books?search=&category=`
pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<BookFilter>,
) -> Json<BooksResponse> {
    let books = services.books(&filter).into_iter().map(BookResponse::from).collect();
    Json(BooksResponse { books })
}
