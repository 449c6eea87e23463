//! Tunable constants for scoring and forecasting.
//!
//! Defaults reproduce the shipped behavior; every value can be overridden
//! through the builder-style setters.

use trendshelf_core::ShelfAction;

/// Genres the zero-shot classifier is asked to choose between.
pub const DEFAULT_CANDIDATE_GENRES: [&str; 8] = [
    "fiction",
    "mystery",
    "romance",
    "science fiction",
    "fantasy",
    "thriller",
    "biography",
    "self-help",
];

/// Labels treated as "positive" in a sentiment distribution (case-insensitive).
pub const DEFAULT_POSITIVE_LABELS: [&str; 2] = ["LABEL_2", "POSITIVE"];

/// Lower bounds (inclusive) of each action band.
///
/// Anything below `transfer` maps to `Deaccession`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ActionThresholds {
    pub acquire: f64,
    pub hold: f64,
    pub transfer: f64,
}

impl Default for ActionThresholds {
    fn default() -> Self {
        Self {
            acquire: 90.0,
            hold: 75.0,
            transfer: 60.0,
        }
    }
}

impl ActionThresholds {
    /// Total over `f64`: NaN falls through to `Deaccession`.
    pub fn action_for(&self, demand: f64) -> ShelfAction {
        if demand >= self.acquire {
            ShelfAction::Acquire
        } else if demand >= self.hold {
            ShelfAction::Hold
        } else if demand >= self.transfer {
            ShelfAction::Transfer
        } else {
            ShelfAction::Deaccession
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub thresholds: ActionThresholds,
    pub candidate_genres: Vec<String>,
    pub positive_labels: Vec<String>,
    /// Baseline used when a record carries no demand.
    pub default_baseline: f64,
    /// Descriptor prefix (in characters) handed to the models.
    pub max_text_chars: usize,
    /// Multiplier applied at adjustment 0.0.
    pub multiplier_floor: f64,
    /// Added to the floor at adjustment 1.0.
    pub multiplier_span: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            thresholds: ActionThresholds::default(),
            candidate_genres: DEFAULT_CANDIDATE_GENRES.iter().map(|g| g.to_string()).collect(),
            positive_labels: DEFAULT_POSITIVE_LABELS.iter().map(|l| l.to_string()).collect(),
            default_baseline: 50.0,
            max_text_chars: 512,
            multiplier_floor: 0.7,
            multiplier_span: 0.6,
        }
    }
}

impl ScoringConfig {
    pub fn with_thresholds(mut self, thresholds: ActionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_candidate_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidate_genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_baseline(mut self, baseline: f64) -> Self {
        self.default_baseline = baseline;
        self
    }

    /// `clamp(base * (floor + span * adjustment), 0, 100)`
    pub fn adjust(&self, base: f64, adjustment: f64) -> f64 {
        (base * (self.multiplier_floor + self.multiplier_span * adjustment)).clamp(0.0, 100.0)
    }

    pub fn is_positive_label(&self, label: &str) -> bool {
        self.positive_labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// How many of the highest-demand books make it into the series.
    pub top_n: usize,
    /// Titles longer than this many characters are cut and suffixed with "...".
    pub label_chars: usize,
    pub noise_std_dev: f64,
    /// Share of the historical value added as upward drift.
    pub trend_factor: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            label_chars: 20,
            noise_std_dev: 5.0,
            trend_factor: 0.05,
        }
    }
}

impl ForecastConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_noise_std_dev(mut self, std_dev: f64) -> Self {
        self.noise_std_dev = std_dev;
        self
    }
}
