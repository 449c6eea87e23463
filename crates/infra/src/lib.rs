//! Infrastructure layer: ingestion, record storage, configuration.
//!
//! Everything around the scoring core that touches files, environment or
//! shared state lives here.

pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod read_model;
