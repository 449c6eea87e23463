use serde::{Deserialize, Serialize};

/// Chart-ready demand forecast.
///
/// `labels`, `historical` and `predicted` are index-aligned and share one length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub labels: Vec<String>,
    pub historical: Vec<f64>,
    pub predicted: Vec<f64>,
}

impl ForecastSeries {
    /// `{labels: [], historical: [], predicted: []}`
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn push(&mut self, label: String, historical: f64, predicted: f64) {
        self.labels.push(label);
        self.historical.push(historical);
        self.predicted.push(predicted);
    }
}
