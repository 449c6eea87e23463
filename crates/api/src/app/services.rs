use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use trendshelf_ai::{DemandScorer, ForecastGenerator};
use trendshelf_core::{BookRecord, ForecastSeries, Prediction};
use trendshelf_infra::{
    config::AppConfig,
    dashboard::{dashboard_summary, DashboardSummary},
    ingest::{parse_upload, IngestError},
    read_model::{BookEntry, BookFilter, BookStore, InMemoryBookStore, UploadRecord},
};

/// How many uploads `/api/uploads` reports.
pub const RECENT_UPLOADS: usize = 10;

/// Shared state behind every handler.
pub struct AppServices {
    scorer: DemandScorer,
    forecaster: ForecastGenerator,
    store: Arc<dyn BookStore>,
    forecast_seed: Option<u64>,
}

impl AppServices {
    pub fn new(scorer: DemandScorer, forecaster: ForecastGenerator, store: Arc<dyn BookStore>) -> Self {
        Self {
            scorer,
            forecaster,
            store,
            forecast_seed: None,
        }
    }

    /// Draw forecast noise from an RNG seeded with `seed` on every request.
    pub fn with_forecast_seed(mut self, seed: Option<u64>) -> Self {
        self.forecast_seed = seed;
        self
    }

    pub fn store(&self) -> &dyn BookStore {
        self.store.as_ref()
    }

    /// Parse, score and store an upload, replacing every stored book.
    ///
    /// The upload is logged either way; a rejected file is logged unprocessed.
    pub fn ingest_upload(&self, filename: &str, bytes: &[u8]) -> Result<usize, IngestError> {
        let records = match parse_upload(filename, bytes) {
            Ok(r) => r,
            Err(e) => {
                warn!(filename, error = %e, "upload rejected");
                self.store.record_upload(UploadRecord {
                    filename: filename.to_string(),
                    uploaded_at: Utc::now(),
                    processed: false,
                    records_count: 0,
                });
                return Err(e);
            }
        };

        let predictions = self.scorer.score_batch(&records);
        let stored = self.store.replace_all(predictions).len();
        self.store.record_upload(UploadRecord {
            filename: filename.to_string(),
            uploaded_at: Utc::now(),
            processed: true,
            records_count: stored,
        });

        info!(filename, records = stored, "upload processed");
        Ok(stored)
    }

    /// Re-score every stored book in place, using its current demand as the baseline.
    pub fn reprocess(&self) -> usize {
        let books = self.store.list(&BookFilter::default());
        if books.is_empty() {
            return 0;
        }

        let records: Vec<BookRecord> = books
            .iter()
            .map(|b| {
                BookRecord::new(b.title.as_str(), b.author.as_str(), b.category.as_str())
                    .with_demand(b.demand)
                    .with_action(b.action)
            })
            .collect();
        let predictions = self.scorer.score_batch(&records);

        let updates = books.iter().map(|b| b.id).zip(predictions).collect();
        let updated = self.store.update_predictions(updates);
        info!(records = updated, "stored books reprocessed");
        updated
    }

    /// Score ad-hoc records without storing them.
    pub fn predict(&self, records: &[BookRecord]) -> Vec<Prediction> {
        self.scorer.score_batch(records)
    }

    pub fn books(&self, filter: &BookFilter) -> Vec<BookEntry> {
        self.store.list(filter)
    }

    /// Forecast over the stored books plus the categories available for filtering.
    pub fn forecast(&self, category: Option<&str>) -> (ForecastSeries, Vec<String>) {
        let books = self.store.list(&BookFilter::default());
        let series = match self.forecast_seed {
            Some(seed) => self
                .forecaster
                .forecast_with_rng(&books, category, &mut StdRng::seed_from_u64(seed)),
            None => self.forecaster.forecast(&books, category),
        };
        (series, self.store.categories())
    }

    pub fn dashboard(&self) -> DashboardSummary {
        dashboard_summary(&self.store.list(&BookFilter::default()))
    }

    pub fn recent_uploads(&self) -> Vec<UploadRecord> {
        self.store.recent_uploads(RECENT_UPLOADS)
    }

    pub fn clear(&self) {
        self.store.clear();
        info!("all book data cleared");
    }
}

/// Wire services from configuration, backed by the in-memory store.
pub fn build_services(config: &AppConfig) -> AppServices {
    let models = Arc::new(config.model_handles());
    let store: Arc<dyn BookStore> = Arc::new(InMemoryBookStore::new());

    AppServices::new(DemandScorer::new(models), ForecastGenerator::default(), store)
        .with_forecast_seed(config.forecast_seed)
}
