//! Data models for the facts scraped about Mars.
//!
//! This module defines the typed entities produced by one scrape run:
//! - [`RenderedPage`]: markup handed from a session to an extractor
//! - [`NewsFact`], [`ImageFact`], [`FactsTable`], [`Hemisphere`]: one per stage
//! - [`MarsSnapshot`]: the aggregate record persisted by the store
//!
//! Everything except [`MarsSnapshot`] lives only for the duration of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page markup after the session's settle delay, plus the URL it came from.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The URL the markup was read from.
    pub url: String,
    /// The full document markup.
    pub html: String,
}

/// The latest headline and its teaser paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsFact {
    pub title: String,
    pub summary: String,
}

/// Absolute URL of the featured full-size image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageFact {
    pub absolute_url: String,
}

/// One body row of the facts table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FactRow {
    /// Value of the "Description" column.
    pub label: String,
    /// Remaining cells, aligned with [`FactsTable::columns`] after the first.
    pub values: Vec<String>,
}

/// The planetary comparison table.
///
/// Each row stores its label plus one value per value column (Mars, Earth),
/// so the persisted form is not a flat list of (label, value) pairs. Use
/// [`FactsTable::column_pairs`] for that view of a single column.
///
/// Rows keep page order and labels are not deduplicated; the source page
/// does not promise unique labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FactsTable {
    /// Header cells, the first one always `"Description"`.
    pub columns: Vec<String>,
    pub rows: Vec<FactRow>,
}

impl FactsTable {
    /// (label, value) pairs for a single value column, in row order.
    ///
    /// Returns `None` if `column` is not one of the value columns.
    pub fn column_pairs(&self, column: &str) -> Option<Vec<(&str, &str)>> {
        let idx = self.columns.iter().skip(1).position(|c| c == column)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.values.get(idx).map(|v| (row.label.as_str(), v.as_str())))
                .collect(),
        )
    }
}

/// A hemisphere's display title and full-resolution sample image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Hemisphere {
    pub title: String,
    pub image_url: String,
}

/// Everything one scrape run produced.
///
/// Stored as a single JSON document; the store replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarsSnapshot {
    pub news: NewsFact,
    pub image: ImageFact,
    pub facts: FactsTable,
    pub hemispheres: Vec<Hemisphere>,
    /// When the run finished.
    pub captured_at: DateTime<Utc>,
}
