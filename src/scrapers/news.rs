//! Latest headline from [Red Planet Science](https://redplanetscience.com/).
//!
//! The headline and the teaser are each the first of their kind on the page.
//! They are not matched up by article, so on a page where the first article
//! lacks a teaser the pair can come from different articles.

use crate::error::ScrapeError;
use crate::models::{NewsFact, RenderedPage};
use crate::utils::element_text;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

pub const NEWS_URL: &str = "https://redplanetscience.com/";

const TITLE_SELECTOR: &str = "div.content_title";
const TEASER_SELECTOR: &str = "div.article_teaser_body";

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(TITLE_SELECTOR).unwrap());
static TEASER: Lazy<Selector> = Lazy::new(|| Selector::parse(TEASER_SELECTOR).unwrap());

/// Extract the first headline and the first teaser paragraph.
///
/// # Errors
///
/// [`ScrapeError::MissingElement`] if either element is absent or empty.
#[instrument(level = "info", skip_all, fields(url = %page.url))]
pub fn extract(page: &RenderedPage) -> Result<NewsFact, ScrapeError> {
    let document = Html::parse_document(&page.html);

    let first_text = |selector: &Selector, name: &str| {
        document
            .select(selector)
            .next()
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ScrapeError::MissingElement {
                selector: name.to_string(),
                url: page.url.clone(),
            })
    };

    let title = first_text(&*TITLE, TITLE_SELECTOR)?;
    let summary = first_text(&*TEASER, TEASER_SELECTOR)?;

    debug!(%title, "Parsed headline");
    info!(title_len = title.len(), summary_len = summary.len(), "Extracted news");
    Ok(NewsFact { title, summary })
}
