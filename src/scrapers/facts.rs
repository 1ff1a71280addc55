//! Mars/Earth comparison table from [Galaxy Facts](https://galaxyfacts-mars.com/).
//!
//! The table is read from the raw page source rather than the rendered
//! session, so the orchestrator hands this module plain HTML.
//!
//! The page's first table has no `<thead>`; its first row holds the column
//! names (`Mars - Earth Comparison`, `Mars`, `Earth`). That row becomes the
//! header, its first cell is renamed to `Description`, and the remaining rows
//! keep their page order with the first cell as the row label.

use crate::error::ScrapeError;
use crate::models::{FactRow, FactsTable};
use crate::utils::element_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, instrument, warn};

pub const FACTS_URL: &str = "https://galaxyfacts-mars.com/";

/// Name given to the header's first column.
pub const LABEL_COLUMN: &str = "Description";

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());

/// Parse the first table of `html` into a [`FactsTable`].
///
/// `url` is only used for error reporting.
///
/// # Errors
///
/// - [`ScrapeError::NoTableFound`] if the page has no `<table>`
/// - [`ScrapeError::MalformedTable`] if the table has no rows, the header has
///   fewer than two columns, or a body row's width differs from the header's
#[instrument(level = "info", skip(html))]
pub fn extract(url: &str, html: &str) -> Result<FactsTable, ScrapeError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&TABLE)
        .next()
        .ok_or_else(|| ScrapeError::NoTableFound {
            url: url.to_string(),
        })?;

    let mut rows = table.select(&ROW).map(|tr| cells(&tr));

    let mut columns = rows.next().ok_or_else(|| ScrapeError::MalformedTable {
        reason: "table has no rows".to_string(),
    })?;
    if columns.len() < 2 {
        return Err(ScrapeError::MalformedTable {
            reason: format!("header row has {} column(s), need at least 2", columns.len()),
        });
    }
    let original_label = std::mem::replace(&mut columns[0], LABEL_COLUMN.to_string());

    let mut body = Vec::new();
    for (i, mut row) in rows.enumerate() {
        if row.len() != columns.len() {
            warn!(row = i + 1, width = row.len(), expected = columns.len(), "Row width mismatch");
            return Err(ScrapeError::MalformedTable {
                reason: format!(
                    "row {} has {} cell(s), header has {}",
                    i + 1,
                    row.len(),
                    columns.len()
                ),
            });
        }
        let label = row.remove(0);
        body.push(FactRow { label, values: row });
    }

    info!(
        %original_label,
        columns = columns.len(),
        rows = body.len(),
        "Extracted facts table"
    );
    Ok(FactsTable {
        columns,
        rows: body,
    })
}

fn cells(row: &ElementRef<'_>) -> Vec<String> {
    row.select(&CELL).map(|cell| element_text(&cell)).collect()
}
