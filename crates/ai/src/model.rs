//! Model seams and the lazily-initialized handles the scorer is built with.
//!
//! Backends live behind two traits so the scorer never knows whether it is
//! talking to a remote inference endpoint, a local lexicon, or a test fake.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::result::AiError;

/// One `(label, probability)` pair from a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Polarity classifier (binary or three-way).
pub trait SentimentModel: Send + Sync {
    /// Probability distribution over the model's polarity labels.
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, AiError>;
}

/// Zero-shot classifier over caller-chosen labels.
pub trait GenreClassifier: Send + Sync {
    /// Scores for each candidate label, highest first.
    fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>, AiError>;
}

/// Both models, ready for inference.
pub struct LoadedModels {
    pub sentiment: Box<dyn SentimentModel>,
    pub classifier: Box<dyn GenreClassifier>,
}

impl LoadedModels {
    pub fn new(
        sentiment: impl SentimentModel + 'static,
        classifier: impl GenreClassifier + 'static,
    ) -> Self {
        Self {
            sentiment: Box::new(sentiment),
            classifier: Box::new(classifier),
        }
    }
}

impl core::fmt::Debug for LoadedModels {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoadedModels").finish_non_exhaustive()
    }
}

/// Produces `LoadedModels`; called at most once per `ModelHandles`.
pub trait ModelLoader: Send + Sync {
    fn name(&self) -> &str {
        "custom"
    }

    fn load(&self) -> Result<LoadedModels, AiError>;
}

impl<F> ModelLoader for F
where
    F: Fn() -> Result<LoadedModels, AiError> + Send + Sync,
{
    fn load(&self) -> Result<LoadedModels, AiError> {
        self()
    }
}

struct DisabledLoader;

impl ModelLoader for DisabledLoader {
    fn name(&self) -> &str {
        "disabled"
    }

    fn load(&self) -> Result<LoadedModels, AiError> {
        Err(AiError::unavailable("models disabled"))
    }
}

#[derive(Debug)]
enum ModelState {
    Ready(LoadedModels),
    Disabled(String),
}

/// Lazily-loaded model pair shared by every scoring call.
///
/// The loader runs on first use (or on an explicit `initialize`). A load
/// failure is remembered: from then on the handles report no models and
/// scoring takes the neutral path without retrying.
pub struct ModelHandles {
    loader: Box<dyn ModelLoader>,
    state: OnceLock<ModelState>,
}

impl ModelHandles {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            state: OnceLock::new(),
        }
    }

    /// Handles that never load anything; every signal is neutral.
    pub fn disabled(reason: impl Into<String>) -> Self {
        let state = OnceLock::new();
        let _ = state.set(ModelState::Disabled(reason.into()));
        Self {
            loader: Box::new(DisabledLoader),
            state,
        }
    }

    /// Handles wrapping models that are already loaded.
    pub fn ready(models: LoadedModels) -> Self {
        let state = OnceLock::new();
        let _ = state.set(ModelState::Ready(models));
        Self {
            loader: Box::new(DisabledLoader),
            state,
        }
    }

    /// Load the models if that has not happened yet. Returns whether they are usable.
    pub fn initialize(&self) -> bool {
        matches!(self.state(), ModelState::Ready(_))
    }

    /// `true` once a load has been attempted (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Why the models are off, if they are.
    pub fn disabled_reason(&self) -> Option<&str> {
        match self.state() {
            ModelState::Disabled(reason) => Some(reason),
            ModelState::Ready(_) => None,
        }
    }

    pub fn sentiment(&self) -> Option<&dyn SentimentModel> {
        match self.state() {
            ModelState::Ready(models) => Some(models.sentiment.as_ref()),
            ModelState::Disabled(_) => None,
        }
    }

    pub fn classifier(&self) -> Option<&dyn GenreClassifier> {
        match self.state() {
            ModelState::Ready(models) => Some(models.classifier.as_ref()),
            ModelState::Disabled(_) => None,
        }
    }

    /// A panicking loader counts as a failed load, so the cell is always filled.
    fn state(&self) -> &ModelState {
        self.state.get_or_init(|| {
            let loader = self.loader.name().to_string();
            match catch_unwind(AssertUnwindSafe(|| self.loader.load())) {
                Ok(Ok(models)) => {
                    info!(loader = %loader, "demand models initialized");
                    ModelState::Ready(models)
                }
                Ok(Err(e)) => {
                    error!(loader = %loader, error = %e, "demand models unavailable; using neutral signals");
                    ModelState::Disabled(e.to_string())
                }
                Err(_) => {
                    error!(loader = %loader, "demand model loader panicked; using neutral signals");
                    ModelState::Disabled("loader panicked".to_string())
                }
            }
        })
    }
}

impl core::fmt::Debug for ModelHandles {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelHandles")
            .field("loader", &self.loader.name())
            .field("state", &self.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(f64);

    impl SentimentModel for Fixed {
        fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, AiError> {
            Ok(vec![LabelScore::new("POSITIVE", self.0)])
        }
    }

    impl GenreClassifier for Fixed {
        fn classify(&self, _text: &str, labels: &[String]) -> Result<Vec<LabelScore>, AiError> {
            Ok(labels.iter().map(|l| LabelScore::new(l.clone(), self.0)).collect())
        }
    }

    #[test]
    fn loader_runs_once_across_repeated_initialize() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handles = ModelHandles::new(move || -> Result<LoadedModels, AiError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(LoadedModels::new(Fixed(0.9), Fixed(0.9)))
        });

        assert!(!handles.is_initialized());
        assert!(handles.initialize());
        assert!(handles.initialize());
        assert!(handles.sentiment().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_load_disables_without_retrying() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handles = ModelHandles::new(move || -> Result<LoadedModels, AiError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AiError::unavailable("weights missing"))
        });

        assert!(!handles.initialize());
        assert!(handles.sentiment().is_none());
        assert!(handles.classifier().is_none());
        assert!(!handles.initialize());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(handles.disabled_reason().unwrap().contains("weights missing"));
    }

    #[test]
    fn panicking_loader_disables_without_retrying() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handles = ModelHandles::new(move || -> Result<LoadedModels, AiError> {
            counter.fetch_add(1, Ordering::SeqCst);
            panic!("weights corrupt");
        });

        assert!(!handles.initialize());
        assert!(handles.is_initialized());
        assert!(handles.sentiment().is_none());
        assert!(!handles.initialize());
        assert_eq!(handles.disabled_reason(), Some("loader panicked"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_handles_are_initialized_and_empty() {
        let handles = ModelHandles::disabled("off");
        assert!(handles.is_initialized());
        assert!(!handles.initialize());
        assert_eq!(handles.disabled_reason(), Some("off"));
    }

    #[test]
    fn ready_handles_skip_the_loader() {
        let handles = ModelHandles::ready(LoadedModels::new(Fixed(0.2), Fixed(0.3)));
        let dist = handles.sentiment().unwrap().classify("x").unwrap();
        assert_eq!(dist[0].score, 0.2);
    }
}
