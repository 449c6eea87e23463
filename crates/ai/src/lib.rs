//! `trendshelf-ai`
//!
//! **Responsibility:** demand scoring and forecasting.
//!
//! This crate turns book records into shelving predictions and chart series:
//! - It must not touch storage or HTTP; callers hand records in and take results out.
//! - Model backends are injected through `ModelHandles`, never looked up globally.
//! - Public operations always succeed; failures degrade to documented defaults.

pub mod config;
pub mod forecast;
pub mod huggingface;
pub mod lexicon;
pub mod model;
pub mod result;
pub mod scorer;

pub use config::{ActionThresholds, ForecastConfig, ScoringConfig, DEFAULT_CANDIDATE_GENRES};
pub use forecast::{ForecastGenerator, ForecastItem};
pub use huggingface::{HfInferenceClient, HfModelLoader, HfSettings};
pub use lexicon::{KeywordGenreClassifier, LexiconModelLoader, LexiconSentiment};
pub use model::{GenreClassifier, LabelScore, LoadedModels, ModelHandles, ModelLoader, SentimentModel};
pub use result::AiError;
pub use scorer::{DemandScorer, FALLBACK_CONFIDENCE, NEUTRAL_SIGNAL};
