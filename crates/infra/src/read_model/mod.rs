//! Record storage for scored books, upload logs and prediction history.

pub mod book_store;

pub use book_store::{
    BookEntry, BookFilter, BookStore, InMemoryBookStore, PredictionHistoryEntry, UploadRecord, MODEL_VERSION,
};
