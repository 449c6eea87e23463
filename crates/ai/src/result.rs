use thiserror::Error;

/// Failures inside the scoring and forecasting core.
///
/// None of these reach callers of `DemandScorer` or `ForecastGenerator`:
/// each one is logged and replaced by a documented default at the boundary.
#[derive(Debug, Error)]
pub enum AiError {
    /// A model could not be loaded, or was disabled by configuration.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A loaded model failed or returned something unusable.
    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AiError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::InferenceFailed(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
