use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

use trendshelf_core::{BookRecord, ForecastSeries, Prediction};

use crate::config::ForecastConfig;
use crate::result::AiError;

/// Anything with a title, a category and a demand figure can be charted.
pub trait ForecastItem {
    fn title(&self) -> &str;
    fn category(&self) -> &str;
    fn demand(&self) -> f64;
}

impl ForecastItem for BookRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn category(&self) -> &str {
        &self.category
    }

    /// Unscored records without a demand chart at zero.
    fn demand(&self) -> f64 {
        self.demand.unwrap_or(0.0)
    }
}

impl ForecastItem for Prediction {
    fn title(&self) -> &str {
        &self.title
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn demand(&self) -> f64 {
        self.demand
    }
}

impl<T: ForecastItem + ?Sized> ForecastItem for &T {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn category(&self) -> &str {
        (**self).category()
    }

    fn demand(&self) -> f64 {
        (**self).demand()
    }
}

/// Top-N demand chart with a jittered "predicted" companion series.
///
/// `predicted[i] = clamp(h + N(0, σ) + trend * h, 0, 100)` rounded to one
/// decimal, where `h = historical[i]`. Pass a seeded RNG for reproducible output.
#[derive(Debug, Clone, Default)]
pub struct ForecastGenerator {
    config: ForecastConfig,
}

impl ForecastGenerator {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast using the thread-local RNG.
    pub fn forecast<T: ForecastItem>(&self, records: &[T], category: Option<&str>) -> ForecastSeries {
        self.forecast_with_rng(records, category, &mut rand::thread_rng())
    }

    /// Forecast drawing noise from `rng`. Never fails: any error yields the empty series.
    pub fn forecast_with_rng<T, R>(&self, records: &[T], category: Option<&str>, rng: &mut R) -> ForecastSeries
    where
        T: ForecastItem,
        R: Rng + ?Sized,
    {
        match self.try_forecast(records, category, rng) {
            Ok(series) => series,
            Err(e) => {
                warn!(error = %e, category = ?category, "forecast generation failed; returning empty series");
                ForecastSeries::empty()
            }
        }
    }

    fn try_forecast<T, R>(&self, records: &[T], category: Option<&str>, rng: &mut R) -> Result<ForecastSeries, AiError>
    where
        T: ForecastItem,
        R: Rng + ?Sized,
    {
        let noise = Normal::new(0.0, self.config.noise_std_dev)
            .map_err(|e| AiError::invalid_input(format!("noise std dev {}: {e}", self.config.noise_std_dev)))?;

        let category = category.filter(|c| !c.is_empty());
        let mut selected: Vec<&T> = records
            .iter()
            .filter(|r| category.is_none_or(|c| r.category() == c))
            .collect();

        if let Some(bad) = selected.iter().find(|r| !r.demand().is_finite()) {
            return Err(AiError::invalid_input(format!(
                "demand for {:?} is not finite",
                bad.title()
            )));
        }

        // Stable: ties keep input order.
        selected.sort_by(|a, b| b.demand().total_cmp(&a.demand()));
        selected.truncate(self.config.top_n);

        let mut series = ForecastSeries::empty();
        for item in selected {
            let historical = item.demand();
            let drift = noise.sample(rng) + self.config.trend_factor * historical;
            let predicted = round1((historical + drift).clamp(0.0, 100.0));
            series.push(chart_label(item.title(), self.config.label_chars), historical, predicted);
        }
        Ok(series)
    }
}

/// Titles over `max_chars` characters are cut there and suffixed with "...".
pub fn chart_label(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &title[..idx]),
        None => title.to_string(),
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use trendshelf_core::ShelfAction;

    fn record(title: &str, category: &str, demand: f64) -> BookRecord {
        BookRecord::new(title, "Author", category).with_demand(demand)
    }

    fn quiet() -> ForecastGenerator {
        ForecastGenerator::new(ForecastConfig::default().with_noise_std_dev(0.0))
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = ForecastGenerator::default().forecast::<BookRecord>(&[], None);
        assert_eq!(series, ForecastSeries::empty());
    }

    #[test]
    fn filtering_to_nothing_gives_empty_series() {
        let books = vec![record("Dune", "Fiction", 90.0)];
        let series = ForecastGenerator::default().forecast(&books, Some("Poetry"));
        assert!(series.is_empty());
        assert!(series.historical.is_empty());
        assert!(series.predicted.is_empty());
    }

    #[test]
    fn category_filter_is_exact() {
        let books = vec![
            record("Dune", "Fiction", 90.0),
            record("Emma", "fiction", 80.0),
            record("Gone Girl", "Fiction", 70.0),
        ];
        let series = quiet().forecast(&books, Some("Fiction"));
        assert_eq!(series.labels, vec!["Dune", "Gone Girl"]);
    }

    #[test]
    fn empty_category_means_no_filter() {
        let books = vec![record("Dune", "Fiction", 90.0), record("Emma", "Romance", 80.0)];
        assert_eq!(quiet().forecast(&books, Some("")).len(), 2);
    }

    #[test]
    fn keeps_top_ten_sorted_descending() {
        let books: Vec<BookRecord> = (0..15)
            .map(|i| record(&format!("Book {i}"), "Fiction", i as f64 * 5.0))
            .collect();
        let series = quiet().forecast(&books, None);
        assert_eq!(series.len(), 10);
        assert_eq!(series.historical[0], 70.0);
        assert_eq!(series.historical[9], 25.0);
        assert!(series.historical.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn ties_keep_input_order() {
        let books = vec![
            record("First", "Fiction", 80.0),
            record("Second", "Fiction", 80.0),
            record("Third", "Fiction", 90.0),
        ];
        assert_eq!(quiet().forecast(&books, None).labels, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        let books = vec![
            record("The Hitchhiker's Guide to the Galaxy", "Fiction", 90.0),
            record("Exactly twenty chars", "Fiction", 80.0),
        ];
        let series = quiet().forecast(&books, None);
        assert_eq!(series.labels[0], "The Hitchhiker's Gui...");
        assert_eq!(series.labels[1], "Exactly twenty chars");
    }

    #[test]
    fn label_truncation_counts_characters_not_bytes() {
        assert_eq!(chart_label("ééééé", 3), "ééé...");
        assert_eq!(chart_label("ééé", 3), "ééé");
    }

    #[test]
    fn without_noise_prediction_is_historical_plus_trend() {
        let books = vec![record("A", "Fiction", 60.0), record("B", "Fiction", 98.0)];
        let series = quiet().forecast(&books, None);
        assert_eq!(series.predicted, vec![100.0, 63.0]);
    }

    #[test]
    fn same_seed_same_forecast() {
        let books: Vec<BookRecord> = (0..8)
            .map(|i| record(&format!("Book {i}"), "Fiction", 40.0 + i as f64 * 7.0))
            .collect();
        let generator = ForecastGenerator::default();
        let a = generator.forecast_with_rng(&books, None, &mut StdRng::seed_from_u64(7));
        let b = generator.forecast_with_rng(&books, None, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_demand_yields_empty_series() {
        let books = vec![record("A", "Fiction", 60.0), record("B", "Fiction", f64::NAN)];
        assert!(ForecastGenerator::default().forecast(&books, None).is_empty());
    }

    #[test]
    fn invalid_noise_configuration_yields_empty_series() {
        let generator = ForecastGenerator::new(ForecastConfig::default().with_noise_std_dev(-1.0));
        assert!(generator.forecast(&[record("A", "Fiction", 60.0)], None).is_empty());
    }

    #[test]
    fn records_without_demand_chart_at_zero() {
        let books = vec![BookRecord::new("Unscored", "A", "Fiction"), record("Scored", "Fiction", 10.0)];
        let series = quiet().forecast(&books, None);
        assert_eq!(series.labels, vec!["Scored", "Unscored"]);
        assert_eq!(series.historical, vec![10.0, 0.0]);
    }

    #[test]
    fn predictions_can_be_forecast_directly() {
        let preds = vec![Prediction {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            category: "Fiction".into(),
            demand: 80.0,
            action: ShelfAction::Hold,
            ai_confidence: 50.0,
        }];
        let series = quiet().forecast(&preds, Some("Fiction"));
        assert_eq!(series.historical, vec![80.0]);
        assert_eq!(series.predicted, vec![84.0]);
    }

    proptest! {
        #[test]
        fn series_shape_and_bounds_hold(
            demands in proptest::collection::vec(0.0f64..=100.0, 0..30),
            seed in any::<u64>(),
        ) {
            let books: Vec<BookRecord> = demands
                .iter()
                .enumerate()
                .map(|(i, d)| record(&format!("Book number {i} with a long title"), "Fiction", *d))
                .collect();
            let series = ForecastGenerator::default()
                .forecast_with_rng(&books, None, &mut StdRng::seed_from_u64(seed));

            prop_assert!(series.len() <= 10);
            prop_assert_eq!(series.len(), demands.len().min(10));
            prop_assert_eq!(series.historical.len(), series.labels.len());
            prop_assert_eq!(series.predicted.len(), series.labels.len());
            prop_assert!(series.historical.windows(2).all(|w| w[0] >= w[1]));
            for p in &series.predicted {
                prop_assert!((0.0..=100.0).contains(p));
            }
            for l in &series.labels {
                prop_assert!(l.chars().count() <= 23);
            }
        }
    }
}
