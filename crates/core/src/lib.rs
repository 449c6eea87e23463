//! `trendshelf-core`: shelving domain building blocks.
//!
//! This crate contains **pure domain** types (no IO, no models, no storage):
//! the book record callers feed in, the prediction the scorer hands back, and
//! the forecast series the dashboard charts.

pub mod book;
pub mod entity;
pub mod error;
pub mod forecast;
pub mod id;

pub use book::{BookRecord, Prediction, ShelfAction};
pub use entity::Entity;
pub use error::DomainError;
pub use forecast::ForecastSeries;
pub use id::BookId;
