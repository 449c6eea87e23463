use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, error, warn};

use trendshelf_core::{BookRecord, Prediction, ShelfAction};

use crate::config::ScoringConfig;
use crate::model::{LabelScore, ModelHandles};
use crate::result::AiError;

/// Signal used whenever a model is missing or misbehaves.
pub const NEUTRAL_SIGNAL: f64 = 0.5;

/// Confidence reported on fallback predictions.
pub const FALLBACK_CONFIDENCE: f64 = 50.0;

/// Blends two model signals with a baseline demand into a shelving prediction.
///
/// Model:
/// - `sentiment`: positive-class probability of the book descriptor.
/// - `genre_relevance`: zero-shot confidence for the book's own category.
/// - `adjustment = (sentiment + genre_relevance) / 2`
/// - `demand = clamp(base * (0.7 + 0.6 * adjustment), 0, 100)`
///
/// Every failure degrades: a broken model contributes `NEUTRAL_SIGNAL`, a
/// broken record gets a fallback prediction. Nothing is returned as an error.
#[derive(Debug, Clone)]
pub struct DemandScorer {
    models: Arc<ModelHandles>,
    config: ScoringConfig,
}

impl DemandScorer {
    pub fn new(models: Arc<ModelHandles>) -> Self {
        Self {
            models,
            config: ScoringConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelHandles {
        &self.models
    }

    /// Score every record; same length and order as the input.
    pub fn score_batch(&self, records: &[BookRecord]) -> Vec<Prediction> {
        if records.is_empty() {
            return Vec::new();
        }
        // Load once up front so the first record doesn't pay for it alone.
        self.models.initialize();
        records.iter().map(|r| self.score(r)).collect()
    }

    /// Score one record. Panics inside a model backend are contained here.
    pub fn score(&self, record: &BookRecord) -> Prediction {
        match catch_unwind(AssertUnwindSafe(|| self.try_score(record))) {
            Ok(Ok(prediction)) => prediction,
            Ok(Err(e)) => {
                warn!(title = %record.title, error = %e, "demand scoring failed; using fallback prediction");
                self.fallback(record)
            }
            Err(_) => {
                error!(title = %record.title, "demand scoring panicked; using fallback prediction");
                self.fallback(record)
            }
        }
    }

    fn try_score(&self, record: &BookRecord) -> Result<Prediction, AiError> {
        let base = record.demand.unwrap_or(self.config.default_baseline);
        if !base.is_finite() {
            return Err(AiError::invalid_input(format!("baseline demand {base} is not finite")));
        }

        let text = truncate_chars(&record.descriptor(), self.config.max_text_chars);
        let sentiment = self.sentiment(&text);
        let genre = self.genre_relevance(&text, &record.category);
        let adjustment = (sentiment + genre) / 2.0;

        let demand = round1(self.config.adjust(base, adjustment));
        let action = self.config.thresholds.action_for(demand);
        debug!(title = %record.title, base, sentiment, genre, demand, action = %action, "scored");

        Ok(Prediction {
            title: record.title.clone(),
            author: record.author.clone(),
            category: record.category.clone(),
            demand,
            action,
            ai_confidence: round1(adjustment * 100.0),
        })
    }

    /// Positive-class probability in \[0, 1\]; `NEUTRAL_SIGNAL` without a working model.
    pub fn sentiment(&self, text: &str) -> f64 {
        let Some(model) = self.models.sentiment() else {
            return NEUTRAL_SIGNAL;
        };

        let result = model
            .classify(text)
            .and_then(|dist| self.positive_mass(&dist));
        match result {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "sentiment model failed; using neutral signal");
                NEUTRAL_SIGNAL
            }
        }
    }

    /// Confidence in \[0, 1\] that the text belongs to `category`.
    ///
    /// Takes the first label that contains the category (case-insensitive),
    /// else the best score overall. `NEUTRAL_SIGNAL` without a working model.
    pub fn genre_relevance(&self, text: &str, category: &str) -> f64 {
        let Some(model) = self.models.classifier() else {
            return NEUTRAL_SIGNAL;
        };

        let result = model
            .classify(text, &self.config.candidate_genres)
            .and_then(|dist| category_score(&dist, category));
        match result {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, category, "genre classifier failed; using neutral signal");
                NEUTRAL_SIGNAL
            }
        }
    }

    fn positive_mass(&self, dist: &[LabelScore]) -> Result<f64, AiError> {
        match dist.iter().find(|ls| self.config.is_positive_label(&ls.label)) {
            Some(ls) => probability(ls.score),
            None => Ok(0.0),
        }
    }

    fn fallback(&self, record: &BookRecord) -> Prediction {
        let demand = match record.demand {
            Some(d) if d.is_finite() => d.clamp(0.0, 100.0),
            _ => self.config.default_baseline,
        };
        Prediction {
            title: record.title.clone(),
            author: record.author.clone(),
            category: record.category.clone(),
            demand,
            action: record.action.unwrap_or(ShelfAction::Hold),
            ai_confidence: FALLBACK_CONFIDENCE,
        }
    }
}

fn category_score(dist: &[LabelScore], category: &str) -> Result<f64, AiError> {
    let wanted = category.to_lowercase();
    if let Some(ls) = dist.iter().find(|ls| ls.label.to_lowercase().contains(&wanted)) {
        return probability(ls.score);
    }

    match dist.iter().map(|ls| ls.score).reduce(f64::max) {
        Some(best) => probability(best),
        None => Ok(NEUTRAL_SIGNAL),
    }
}

fn probability(score: f64) -> Result<f64, AiError> {
    if !score.is_finite() {
        return Err(AiError::inference(format!("model returned non-finite score {score}")));
    }
    Ok(score.clamp(0.0, 1.0))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
