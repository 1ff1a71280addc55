//! Hemisphere images from [Mars Hemispheres](https://marshemispheres.com/).
//!
//! This is the only interactive extractor. It walks the site the way a
//! visitor would:
//!
//! ```text
//! IndexPage ──discover()──▶ [names]
//!     │
//!     └─ for each name:
//!          IndexPage ──open_hemisphere(name)──▶ DetailPage
//!          DetailPage ──sample_url()──▶ image URL
//!          DetailPage ──back()──▶ IndexPage
//! ```
//!
//! All names are read before the first click, since leaving the index page
//! invalidates the markup they were read from. [`IndexPage`] and
//! [`DetailPage`] each consume themselves on navigation, so following "Back"
//! from the index, or opening a hemisphere from a detail page, does not
//! compile.

use crate::browser::PageFetcher;
use crate::error::ScrapeError;
use crate::models::{Hemisphere, RenderedPage};
use crate::utils::{LinkMatch, element_text, find_link_href};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const HEMISPHERES_URL: &str = "https://marshemispheres.com/";

const DESCRIPTION_SELECTOR: &str = "div.description";
const SAMPLE_LINK: &str = "Sample";
const BACK_LINK: &str = "Back";
const TITLE_SUFFIX: &str = " Enhanced";

static DESCRIPTION: Lazy<Selector> = Lazy::new(|| Selector::parse(DESCRIPTION_SELECTOR).unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());

/// The session is on the hemisphere index.
pub struct IndexPage<'s, S: PageFetcher> {
    session: &'s mut S,
    page: RenderedPage,
}

/// The session is on one hemisphere's detail page.
pub struct DetailPage<'s, S: PageFetcher> {
    session: &'s mut S,
    page: RenderedPage,
}

impl<'s, S: PageFetcher> IndexPage<'s, S> {
    /// Navigate the session to the index at `url`.
    pub async fn open(session: &'s mut S, url: &str) -> Result<Self, ScrapeError> {
        let page = session.fetch(url).await?;
        Ok(Self { session, page })
    }

    /// Names of every hemisphere on the index, in page order.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::MissingElement`] if there are no description blocks or
    /// one of them has no `h3` heading.
    pub fn discover(&self) -> Result<Vec<String>, ScrapeError> {
        let document = Html::parse_document(&self.page.html);
        let names = document
            .select(&DESCRIPTION)
            .map(|block| {
                block
                    .select(&HEADING)
                    .next()
                    .map(|h3| element_text(&h3))
                    .ok_or_else(|| ScrapeError::MissingElement {
                        selector: format!("{DESCRIPTION_SELECTOR} h3"),
                        url: self.page.url.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if names.is_empty() {
            return Err(ScrapeError::MissingElement {
                selector: DESCRIPTION_SELECTOR.to_string(),
                url: self.page.url.clone(),
            });
        }
        Ok(names)
    }

    /// Click through to the hemisphere whose link text contains `name`.
    pub async fn open_hemisphere(self, name: &str) -> Result<DetailPage<'s, S>, ScrapeError> {
        self.session.follow_link_by_partial_text(name).await?;
        let page = self.session.current_page().await?;
        debug!(%name, url = %page.url, "Opened hemisphere");
        Ok(DetailPage {
            session: self.session,
            page,
        })
    }
}

impl<'s, S: PageFetcher> DetailPage<'s, S> {
    /// Absolute URL of the full-resolution "Sample" image.
    ///
    /// The link's `href` is resolved against the detail page URL, matching
    /// what a browser reports for the link.
    pub fn sample_url(&self) -> Result<String, ScrapeError> {
        let href = find_link_href(&self.page.html, SAMPLE_LINK, LinkMatch::Exact).ok_or_else(|| {
            ScrapeError::LinkNotFound {
                text: SAMPLE_LINK.to_string(),
                url: self.page.url.clone(),
            }
        })?;
        let resolved = Url::parse(&self.page.url)
            .and_then(|base| base.join(&href))
            .map_err(|e| ScrapeError::Browser(format!("bad sample link {href:?}: {e}")))?;
        Ok(resolved.to_string())
    }

    /// Follow the "Back" link to the index.
    pub async fn back(self) -> Result<IndexPage<'s, S>, ScrapeError> {
        self.session.follow_link_by_partial_text(BACK_LINK).await?;
        let page = self.session.current_page().await?;
        Ok(IndexPage {
            session: self.session,
            page,
        })
    }
}

/// Display title for a hemisphere: `name` without a trailing `" Enhanced"`.
///
/// Only an exact, case-sensitive suffix is removed.
pub fn display_title(name: &str) -> &str {
    name.strip_suffix(TITLE_SUFFIX).unwrap_or(name)
}

/// Visit every hemisphere listed on the index at `url`.
///
/// Either every discovered hemisphere is returned, in discovery order, or the
/// call fails.
///
/// # Errors
///
/// - [`ScrapeError::MissingElement`] if discovery finds nothing usable
/// - [`ScrapeError::NavigationFailed`] naming the hemisphere whose round trip
///   broke, wrapping the underlying cause
#[instrument(level = "info", skip(session))]
pub async fn extract<S: PageFetcher>(session: &mut S, url: &str) -> Result<Vec<Hemisphere>, ScrapeError> {
    let mut index = IndexPage::open(session, url).await?;
    let names = index.discover()?;
    info!(count = names.len(), "Discovered hemispheres");

    let mut hemispheres = Vec::with_capacity(names.len());
    for name in &names {
        let (next_index, hemisphere) = visit(index, name).await.map_err(|source| {
            warn!(%name, error = %source, "Hemisphere round trip failed");
            ScrapeError::NavigationFailed {
                hemisphere: name.clone(),
                source: Box::new(source),
            }
        })?;
        debug!(title = %hemisphere.title, image_url = %hemisphere.image_url, "Extracted hemisphere");
        hemispheres.push(hemisphere);
        index = next_index;
    }

    info!(count = hemispheres.len(), "Extracted hemispheres");
    Ok(hemispheres)
}

async fn visit<'s, S: PageFetcher>(
    index: IndexPage<'s, S>,
    name: &str,
) -> Result<(IndexPage<'s, S>, Hemisphere), ScrapeError> {
    let detail = index.open_hemisphere(name).await?;
    let image_url = detail.sample_url()?;
    let hemisphere = Hemisphere {
        title: display_title(name).to_string(),
        image_url,
    };
    let index = detail.back().await?;
    Ok((index, hemisphere))
}
