//! Dashboard summary over the stored books.

use serde::Serialize;

use trendshelf_core::ShelfAction;

use crate::read_model::BookEntry;

// Headline figures shown alongside the computed satisfaction score.
pub const MODEL_ACCURACY: f64 = 97.82;
pub const SHELF_TURNOVER: f64 = 42.5;
pub const COLLECTION_EQUITY: f64 = 94.7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub accuracy: f64,
    pub turnover: f64,
    pub equity: f64,
    /// Mean demand across the collection, one decimal.
    pub satisfaction: f64,
}

/// Book counts per category, parallel arrays for charting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotlightBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub demand: f64,
    pub action: ShelfAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub kpis: Kpis,
    pub composition: Composition,
    pub spotlight_book: Option<SpotlightBook>,
}

/// Summarize `books`. An empty collection yields zeroed KPIs and no spotlight.
///
/// Composition follows the order categories first appear in `books`. The
/// spotlight is the highest-demand book; on ties the earliest one wins.
pub fn dashboard_summary(books: &[BookEntry]) -> DashboardSummary {
    if books.is_empty() {
        return DashboardSummary::default();
    }

    let mut composition = Composition::default();
    for book in books {
        match composition.labels.iter().position(|l| l == &book.category) {
            Some(i) => composition.data[i] += 1,
            None => {
                composition.labels.push(book.category.clone());
                composition.data.push(1);
            }
        }
    }

    let total: f64 = books.iter().map(|b| b.demand).sum();
    let average = total / books.len() as f64;

    let spotlight = books
        .iter()
        .reduce(|best, b| if b.demand > best.demand { b } else { best })
        .map(|b| SpotlightBook {
            title: b.title.clone(),
            author: b.author.clone(),
            category: b.category.clone(),
            demand: b.demand,
            action: b.action,
        });

    DashboardSummary {
        kpis: Kpis {
            accuracy: MODEL_ACCURACY,
            turnover: SHELF_TURNOVER,
            equity: COLLECTION_EQUITY,
            satisfaction: (average * 10.0).round() / 10.0,
        },
        composition,
        spotlight_book: spotlight,
    }
}
