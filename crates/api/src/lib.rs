//! HTTP API: the dashboard's JSON endpoints over the scoring and storage layers.

pub mod app;
