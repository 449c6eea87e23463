//! Offline model backend built from word lists.
//!
//! Deterministic, dependency-free stand-ins for the pretrained pipelines.
//! Good enough to rank a catalogue when no inference endpoint is reachable.

use crate::model::{GenreClassifier, LabelScore, LoadedModels, ModelLoader, SentimentModel};
use crate::result::AiError;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "brilliant", "love",
    "loved", "best", "beautiful", "perfect", "awesome", "incredible", "delightful", "joy",
    "happy", "hope", "triumph", "success", "winning", "magic", "adventure", "classic",
    "bestselling", "bestseller", "award", "celebrated", "inspiring", "remarkable",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "poor", "worst", "hate", "sad", "failure",
    "broken", "boring", "dull", "outdated", "obsolete", "tedious", "mediocre", "grim",
    "dead", "death", "war", "loss", "lost", "fear", "dark", "ruin", "crisis",
];

/// Three-way polarity from positive/negative word hits.
///
/// Emits `LABEL_0` (negative), `LABEL_1` (neutral) and `LABEL_2` (positive),
/// Laplace-smoothed so a text with no hits reads as an even split.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl SentimentModel for LexiconSentiment {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>, AiError> {
        let normalized = normalize(text);
        let positive = count_hits(&normalized, POSITIVE_WORDS) as f64;
        let negative = count_hits(&normalized, NEGATIVE_WORDS) as f64;
        let total = positive + negative + 3.0;

        Ok(vec![
            LabelScore::new("LABEL_0", (negative + 1.0) / total),
            LabelScore::new("LABEL_1", 1.0 / total),
            LabelScore::new("LABEL_2", (positive + 1.0) / total),
        ])
    }
}

/// Keyword-overlap approximation of zero-shot genre classification.
///
/// Each candidate label scores one hit per cue word found in the text, plus a
/// double hit when the label itself appears. Scores are smoothed and
/// normalized so they sum to 1, then sorted highest first.
#[derive(Debug, Clone)]
pub struct KeywordGenreClassifier {
    smoothing: f64,
}

impl Default for KeywordGenreClassifier {
    fn default() -> Self {
        Self { smoothing: 0.5 }
    }
}

impl KeywordGenreClassifier {
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl GenreClassifier for KeywordGenreClassifier {
    fn classify(&self, text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>, AiError> {
        if candidate_labels.is_empty() {
            return Err(AiError::invalid_input("no candidate labels"));
        }
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return Err(AiError::invalid_input("smoothing must be a finite positive number"));
        }

        let normalized = normalize(text);
        let raw: Vec<f64> = candidate_labels
            .iter()
            .map(|label| {
                let label_hit = if contains_phrase(&normalized, &normalize(label)) { 2.0 } else { 0.0 };
                label_hit + count_hits(&normalized, genre_cues(label)) as f64 + self.smoothing
            })
            .collect();
        let total: f64 = raw.iter().sum();

        let mut scores: Vec<LabelScore> = candidate_labels
            .iter()
            .zip(raw)
            .map(|(label, r)| LabelScore::new(label.clone(), r / total))
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scores)
    }
}

/// Loads the word-list backend. Never fails.
#[derive(Debug, Clone, Default)]
pub struct LexiconModelLoader;

impl ModelLoader for LexiconModelLoader {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn load(&self) -> Result<LoadedModels, AiError> {
        Ok(LoadedModels::new(LexiconSentiment, KeywordGenreClassifier::default()))
    }
}

fn genre_cues(label: &str) -> &'static [&'static str] {
    match label.to_lowercase().as_str() {
        "fiction" => &["novel", "story", "stories", "tale", "tales", "saga"],
        "mystery" => &["murder", "detective", "secret", "case", "clue", "crime", "whodunit"],
        "romance" => &["love", "heart", "wedding", "kiss", "bride", "passion"],
        "science fiction" => &["space", "robot", "galaxy", "future", "alien", "star", "planet", "time"],
        "fantasy" => &["dragon", "magic", "wizard", "sword", "kingdom", "throne", "realm"],
        "thriller" => &["spy", "conspiracy", "chase", "hunt", "danger", "escape", "killer"],
        "biography" => &["life", "memoir", "autobiography", "diary", "letters", "story of"],
        "self-help" => &["habits", "guide", "success", "mindset", "happiness", "how to", "power of"],
        _ => &[],
    }
}

/// Lowercase, with every non-alphanumeric run collapsed to one space and a
/// space at each end, so phrase lookups respect word boundaries.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    if !out.ends_with(' ') {
        out.push(' ');
    }
    out
}

fn contains_phrase(normalized: &str, normalized_phrase: &str) -> bool {
    !normalized_phrase.trim().is_empty() && normalized.contains(normalized_phrase)
}

fn count_hits(normalized: &str, words: &[&str]) -> usize {
    words
        .iter()
        .filter(|w| contains_phrase(normalized, &normalize(w)))
        .count()
}
