use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use trendshelf_core::{BookId, Entity, Prediction, ShelfAction};

/// Model version stamped on prediction history rows.
pub const MODEL_VERSION: &str = "v1.0";

/// A scored book as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub demand: f64,
    pub action: ShelfAction,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookEntry {
    pub fn from_prediction(prediction: Prediction, now: DateTime<Utc>) -> Self {
        Self {
            id: BookId::new(),
            title: prediction.title,
            author: prediction.author,
            category: prediction.category,
            demand: prediction.demand,
            action: prediction.action,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_prediction(&self, ai_confidence: f64) -> Prediction {
        Prediction {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            demand: self.demand,
            action: self.action,
            ai_confidence,
        }
    }
}

impl Entity for BookEntry {
    type Id = BookId;

    fn id(&self) -> &BookId {
        &self.id
    }
}

impl trendshelf_ai::ForecastItem for BookEntry {
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

/// One uploaded file and what came of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub processed: bool,
    pub records_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionHistoryEntry {
    pub book_id: BookId,
    pub predicted_demand: f64,
    pub actual_demand: Option<f64>,
    pub prediction_date: DateTime<Utc>,
    pub model_version: String,
}

/// Listing filter. Empty strings are treated as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookFilter {
    /// Case-insensitive substring of title or author.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact category.
    #[serde(default)]
    pub category: Option<String>,
}

impl BookFilter {
    pub fn matches(&self, book: &BookEntry) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
            }
            None => true,
        };
        let category_ok = match self.category.as_deref().filter(|c| !c.is_empty()) {
            Some(c) => book.category == c,
            None => true,
        };
        search_ok && category_ok
    }
}

/// Flat record store for scored books, uploads and prediction history.
pub trait BookStore: Send + Sync {
    /// Upload semantics: drop every stored book, then insert `predictions` in order.
    fn replace_all(&self, predictions: Vec<Prediction>) -> Vec<BookEntry>;

    /// Matching books ordered by demand (desc) then title.
    fn list(&self, filter: &BookFilter) -> Vec<BookEntry>;

    /// Distinct categories in listing order.
    fn categories(&self) -> Vec<String>;

    /// Overwrite demand/action of existing books. Returns how many were found.
    fn update_predictions(&self, updates: Vec<(BookId, Prediction)>) -> usize;

    fn record_upload(&self, upload: UploadRecord);

    /// Most recent first.
    fn recent_uploads(&self, limit: usize) -> Vec<UploadRecord>;

    /// Most recent first.
    fn prediction_history(&self, book_id: &BookId) -> Vec<PredictionHistoryEntry>;

    /// Remove books, uploads and history.
    fn clear(&self);
}

impl<S> BookStore for Arc<S>
where
    S: BookStore + ?Sized,
{
    fn replace_all(&self, predictions: Vec<Prediction>) -> Vec<BookEntry> {
        (**self).replace_all(predictions)
    }

    fn list(&self, filter: &BookFilter) -> Vec<BookEntry> {
        (**self).list(filter)
    }

    fn categories(&self) -> Vec<String> {
        (**self).categories()
    }

    fn update_predictions(&self, updates: Vec<(BookId, Prediction)>) -> usize {
        (**self).update_predictions(updates)
    }

    fn record_upload(&self, upload: UploadRecord) {
        (**self).record_upload(upload)
    }

    fn recent_uploads(&self, limit: usize) -> Vec<UploadRecord> {
        (**self).recent_uploads(limit)
    }

    fn prediction_history(&self, book_id: &BookId) -> Vec<PredictionHistoryEntry> {
        (**self).prediction_history(book_id)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

#[derive(Debug, Default)]
struct Tables {
    books: Vec<BookEntry>,
    uploads: Vec<UploadRecord>,
    history: Vec<PredictionHistoryEntry>,
}

/// In-memory store for dev/tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: RwLock<Tables>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoned locks are recovered: the tables are plain rows with no
    // cross-table invariant a panicking writer could break.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("book store lock poisoned; reading recovered tables");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("book store lock poisoned; writing to recovered tables");
            PoisonError::into_inner(poisoned)
        })
    }
}

fn history_row(book: &BookEntry, now: DateTime<Utc>) -> PredictionHistoryEntry {
    PredictionHistoryEntry {
        book_id: book.id,
        predicted_demand: book.demand,
        actual_demand: None,
        prediction_date: now,
        model_version: MODEL_VERSION.to_string(),
    }
}

fn listing_order(a: &BookEntry, b: &BookEntry) -> std::cmp::Ordering {
    b.demand.total_cmp(&a.demand).then_with(|| a.title.cmp(&b.title))
}

impl BookStore for InMemoryBookStore {
    fn replace_all(&self, predictions: Vec<Prediction>) -> Vec<BookEntry> {
        let now = Utc::now();
        let entries: Vec<BookEntry> = predictions
            .into_iter()
            .map(|p| BookEntry::from_prediction(p, now))
            .collect();

        let mut t = self.write();
        let ids: Vec<BookId> = t.books.iter().map(|b| b.id).collect();
        t.history.retain(|h| !ids.contains(&h.book_id));
        t.books = entries.clone();
        t.history.extend(entries.iter().map(|b| history_row(b, now)));
        entries
    }

    fn list(&self, filter: &BookFilter) -> Vec<BookEntry> {
        let t = self.read();
        let mut out: Vec<BookEntry> = t.books.iter().filter(|b| filter.matches(b)).cloned().collect();
        out.sort_by(listing_order);
        out
    }

    fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for book in self.list(&BookFilter::default()) {
            if !seen.contains(&book.category) {
                seen.push(book.category);
            }
        }
        seen
    }

    fn update_predictions(&self, updates: Vec<(BookId, Prediction)>) -> usize {
        let now = Utc::now();
        let mut found = 0;

        let mut t = self.write();
        let Tables { books, history, .. } = &mut *t;
        for (id, p) in updates {
            if let Some(book) = books.iter_mut().find(|b| b.id == id) {
                book.demand = p.demand;
                book.action = p.action;
                book.updated_at = now;
                history.push(history_row(book, now));
                found += 1;
            }
        }
        found
    }

    fn record_upload(&self, upload: UploadRecord) {
        self.write().uploads.push(upload);
    }

    fn recent_uploads(&self, limit: usize) -> Vec<UploadRecord> {
        self.read().uploads.iter().rev().take(limit).cloned().collect()
    }

    fn prediction_history(&self, book_id: &BookId) -> Vec<PredictionHistoryEntry> {
        self.read()
            .history
            .iter()
            .rev()
            .filter(|h| &h.book_id == book_id)
            .cloned()
            .collect()
    }

    fn clear(&self) {
        *self.write() = Tables::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn prediction(title: &str, author: &str, category: &str, demand: f64) -> Prediction {
        Prediction {
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            demand,
            action: ShelfAction::Hold,
            ai_confidence: 50.0,
        }
    }

    fn seeded() -> InMemoryBookStore {
        let store = InMemoryBookStore::new();
        store.replace_all(vec![
            prediction("Emma", "Jane Austen", "Romance", 70.0),
            prediction("Dune", "Frank Herbert", "Science Fiction", 92.0),
            prediction("Persuasion", "Jane Austen", "Romance", 70.0),
            prediction("Gone Girl", "Gillian Flynn", "Thriller", 81.5),
        ]);
        store
    }

    fn titles(books: &[BookEntry]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn list_orders_by_demand_then_title() {
        let books = seeded().list(&BookFilter::default());
        assert_eq!(titles(&books), vec!["Dune", "Gone Girl", "Emma", "Persuasion"]);
    }

    #[test]
    fn search_matches_title_or_author_case_insensitively() {
        let store = seeded();
        let by_author = store.list(&BookFilter {
            search: Some("austen".into()),
            category: None,
        });
        assert_eq!(titles(&by_author), vec!["Emma", "Persuasion"]);

        let by_title = store.list(&BookFilter {
            search: Some("GONE".into()),
            category: None,
        });
        assert_eq!(titles(&by_title), vec!["Gone Girl"]);
    }

    #[test]
    fn category_filter_is_exact_and_blank_means_all() {
        let store = seeded();
        let romance = store.list(&BookFilter {
            search: None,
            category: Some("Romance".into()),
        });
        assert_eq!(romance.len(), 2);
        assert!(store
            .list(&BookFilter {
                search: None,
                category: Some("romance".into())
            })
            .is_empty());
        assert_eq!(
            store
                .list(&BookFilter {
                    search: Some(" ".into()),
                    category: Some(String::new())
                })
                .len(),
            4
        );
    }

    #[test]
    fn replace_all_discards_previous_books_and_their_history() {
        let store = seeded();
        let old_id = store.list(&BookFilter::default())[0].id;
        assert_eq!(store.prediction_history(&old_id).len(), 1);

        let entries = store.replace_all(vec![prediction("Solo", "A", "Fiction", 10.0)]);
        assert_eq!(entries.len(), 1);
        assert_eq!(titles(&store.list(&BookFilter::default())), vec!["Solo"]);
        assert!(store.prediction_history(&old_id).is_empty());
        assert_eq!(store.prediction_history(entries[0].id()).len(), 1);
    }

    #[test]
    fn categories_are_distinct_in_listing_order() {
        assert_eq!(seeded().categories(), vec!["Science Fiction", "Thriller", "Romance"]);
    }

    #[test]
    fn update_predictions_rewrites_demand_and_appends_history() {
        let store = seeded();
        let dune = store.list(&BookFilter::default())[0].clone();

        let mut rescored = dune.to_prediction(61.0);
        rescored.demand = 40.0;
        rescored.action = ShelfAction::Deaccession;
        let found = store.update_predictions(vec![(dune.id, rescored), (BookId::new(), prediction("X", "Y", "Z", 1.0))]);

        assert_eq!(found, 1);
        let after = store.list(&BookFilter::default());
        let updated = after.iter().find(|b| b.id == dune.id).unwrap();
        assert_eq!(updated.demand, 40.0);
        assert_eq!(updated.action, ShelfAction::Deaccession);
        assert_eq!(updated.created_at, dune.created_at);

        let history = store.prediction_history(&dune.id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].predicted_demand, 40.0);
        assert_eq!(history[0].model_version, MODEL_VERSION);
        assert_eq!(history[0].actual_demand, None);
    }

    #[test]
    fn uploads_are_listed_most_recent_first() {
        let store = InMemoryBookStore::new();
        for i in 0..12 {
            store.record_upload(UploadRecord {
                filename: format!("file-{i}.csv"),
                uploaded_at: Utc::now(),
                processed: true,
                records_count: i,
            });
        }
        let recent = store.recent_uploads(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].filename, "file-11.csv");
        assert_eq!(recent[9].filename, "file-2.csv");
    }

    #[test]
    fn clear_empties_everything() {
        let store = seeded();
        store.record_upload(UploadRecord {
            filename: "a.csv".into(),
            uploaded_at: Utc::now(),
            processed: true,
            records_count: 4,
        });
        store.clear();
        assert!(store.list(&BookFilter::default()).is_empty());
        assert!(store.recent_uploads(10).is_empty());
        assert!(store.categories().is_empty());
    }

    #[test]
    fn store_keeps_working_after_a_panic_under_the_lock() {
        let store = Arc::new(seeded());
        let poisoner = Arc::clone(&store);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(joined.is_err());
        assert!(store.inner.is_poisoned());

        assert_eq!(store.list(&BookFilter::default()).len(), 4);

        let entries = store.replace_all(vec![prediction("Solo", "A", "Fiction", 10.0)]);
        assert_eq!(titles(&store.list(&BookFilter::default())), vec!["Solo"]);
        assert_eq!(store.prediction_history(&entries[0].id).len(), 1);

        let mut rescored = entries[0].to_prediction(50.0);
        rescored.demand = 20.0;
        assert_eq!(store.update_predictions(vec![(entries[0].id, rescored)]), 1);
        assert_eq!(store.prediction_history(&entries[0].id).len(), 2);

        store.record_upload(UploadRecord {
            filename: "after.csv".into(),
            uploaded_at: Utc::now(),
            processed: true,
            records_count: 1,
        });
        assert_eq!(store.recent_uploads(10)[0].filename, "after.csv");

        store.clear();
        assert!(store.list(&BookFilter::default()).is_empty());
        assert!(store.recent_uploads(10).is_empty());
    }

    #[test]
    fn arc_wrapped_store_delegates() {
        let store: Arc<dyn BookStore> = Arc::new(seeded());
        assert_eq!(store.list(&BookFilter::default()).len(), 4);
    }

    proptest! {
        #[test]
        fn listing_is_sorted_by_demand(demands in proptest::collection::vec(0.0f64..=100.0, 0..25)) {
            let store = InMemoryBookStore::new();
            store.replace_all(
                demands
                    .iter()
                    .enumerate()
                    .map(|(i, d)| prediction(&format!("Book {i:02}"), "A", "Fiction", *d))
                    .collect(),
            );
            let listed = store.list(&BookFilter::default());
            prop_assert_eq!(listed.len(), demands.len());
            prop_assert!(listed.windows(2).all(|w| w[0].demand >= w[1].demand));
        }
    }
}
