//! Featured full-size image from [Space Images](https://spaceimages-mars.com/).

use crate::error::ScrapeError;
use crate::models::{ImageFact, RenderedPage};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{info, instrument};

pub const IMAGE_URL: &str = "https://spaceimages-mars.com/";

/// Origin every featured image reference is appended to.
///
/// This is deliberately not the page URL: references are joined to this
/// origin by plain string concatenation, whatever page they came from.
pub const IMAGE_ORIGIN: &str = "https://spaceimages-mars.com/";

const FULL_IMAGE_SELECTOR: &str = "a.showimg.fancybox-thumbs";

static FULL_IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse(FULL_IMAGE_SELECTOR).unwrap());

/// Extract the featured image link and make it absolute.
///
/// # Errors
///
/// [`ScrapeError::MissingElement`] if the full-image anchor is absent or has
/// no `href`.
#[instrument(level = "info", skip_all, fields(url = %page.url))]
pub fn extract(page: &RenderedPage) -> Result<ImageFact, ScrapeError> {
    let document = Html::parse_document(&page.html);
    let href = document
        .select(&FULL_IMAGE)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| ScrapeError::MissingElement {
            selector: format!("{FULL_IMAGE_SELECTOR}[href]"),
            url: page.url.clone(),
        })?;

    let absolute_url = join_origin(href);
    info!(%absolute_url, "Extracted featured image");
    Ok(ImageFact { absolute_url })
}

/// `IMAGE_ORIGIN` followed by `reference`, with one leading `/` of the
/// reference dropped so the seam never doubles up.
///
/// No other URL normalization happens: `..` segments, query strings and even
/// absolute references are appended as-is.
pub fn join_origin(reference: &str) -> String {
    let reference = reference.strip_prefix('/').unwrap_or(reference);
    format!("{IMAGE_ORIGIN}{reference}")
}
