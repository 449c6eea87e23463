//! Input normalization: turn uploaded spreadsheets into `BookRecord`s.
//!
//! Column names vary between exports; `columns` maps them onto the canonical
//! record shape and `upload` handles the file formats.

pub mod columns;
pub mod upload;

use thiserror::Error;

pub use columns::{normalize_columns, ColumnMap, Field};
pub use upload::{parse_csv, parse_excel, parse_json, parse_upload, UploadFormat};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Missing required column. Please ensure your file has a column for '{column}' (e.g., {aliases}).")]
    MissingColumn { column: &'static str, aliases: String },

    #[error("Unsupported file format {0:?}. Please upload CSV, Excel or JSON.")]
    UnsupportedFormat(String),

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unreadable workbook: {0}")]
    Excel(#[from] calamine::Error),
}
