//! HTML table view of a [`FactsTable`].
//!
//! The stored snapshot keeps the table as structured rows; this view exists
//! for templates that want to drop a ready-made `<table>` into a page.

use crate::models::FactsTable;
use html_escape::encode_text;
use std::fmt::Write;

/// Render `table` as a Bootstrap-styled HTML table.
///
/// Labels become row headers (`<th>`), every cell is HTML-escaped.
pub fn facts_table_to_html(table: &FactsTable) -> String {
    let mut html = String::new();
    html.push_str("<table class=\"table table-striped\">\n  <thead>\n    <tr>\n");
    for column in &table.columns {
        let _ = writeln!(html, "      <th>{}</th>", encode_text(column));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in &table.rows {
        html.push_str("    <tr>\n");
        let _ = writeln!(html, "      <th>{}</th>", encode_text(&row.label));
        for value in &row.values {
            let _ = writeln!(html, "      <td>{}</td>", encode_text(value));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}
