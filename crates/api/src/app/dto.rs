use serde::{Deserialize, Serialize};

use trendshelf_core::{BookRecord, ForecastSeries, Prediction, ShelfAction};
use trendshelf_infra::read_model::{BookEntry, UploadRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub books: Vec<BookRecord>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub demand: f64,
    pub action: ShelfAction,
}

impl From<BookEntry> for BookResponse {
    fn from(b: BookEntry) -> Self {
        Self {
            id: b.id.to_string(),
            title: b.title,
            author: b.author,
            category: b.category,
            demand: b.demand,
            action: b.action,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<BookResponse>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub forecast: ForecastSeries,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize)]
pub struct ProcessedResponse {
    pub success: bool,
    pub message: String,
    pub records_count: usize,
}

impl ProcessedResponse {
    pub fn new(message: impl Into<String>, records_count: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            records_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadsResponse {
    pub uploads: Vec<UploadRecord>,
}
