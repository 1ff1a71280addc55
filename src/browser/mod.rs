//! Browser sessions that fetch pages and follow links for the extractors.
//!
//! A [`Launcher`] opens one [`PageFetcher`] session per scrape run. The
//! orchestrator owns that session for the whole run and closes it on every
//! exit path.
//!
//! # Backends
//!
//! | Backend | Module | Notes |
//! |---------|--------|-------|
//! | HTTP | [`http`] | `reqwest` + `scraper`; link clicks are emulated by resolving `href` |
//! | Chromium | `chromium` | `chromiumoxide`, behind the `chromium` feature; renders client-side content |
//!
//! # Settle delay
//!
//! Every navigation (`fetch` or a followed link) waits for
//! [`SessionConfig::settle`] before markup is considered final. Tests use a
//! zero delay so they stay deterministic.
//!
//! # Link selection
//!
//! Links are matched on their whitespace-normalized visible text. When more
//! than one link matches, the first one in document order wins.

#[cfg(feature = "chromium")]
pub mod chromium;
pub mod http;

use crate::error::ScrapeError;
use crate::models::RenderedPage;
use std::time::Duration;

/// Settle delay used when none is configured.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1000);

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timing knobs shared by every backend.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Minimum wait after a navigation before markup is read.
    pub settle: Duration,
    /// Upper bound on a single request or navigation.
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One controllable browsing session.
pub trait PageFetcher {
    /// Navigate to `url` and return its markup once settled.
    async fn fetch(&mut self, url: &str) -> Result<RenderedPage, ScrapeError>;

    /// Raw page source for `url`, fetched outside the browsing history.
    ///
    /// Does not change the current page.
    async fn fetch_static(&mut self, url: &str) -> Result<String, ScrapeError>;

    /// Markup of the page the session is currently on.
    async fn current_page(&mut self) -> Result<RenderedPage, ScrapeError>;

    /// Follow the first link whose visible text equals `text`.
    async fn follow_link_by_text(&mut self, text: &str) -> Result<(), ScrapeError>;

    /// Follow the first link whose visible text contains `text`.
    async fn follow_link_by_partial_text(&mut self, text: &str) -> Result<(), ScrapeError>;

    /// Release the session's resources.
    async fn close(self) -> Result<(), ScrapeError>;
}

/// Opens a fresh [`PageFetcher`] for each run.
pub trait Launcher {
    type Session: PageFetcher;

    async fn launch(&self) -> Result<Self::Session, ScrapeError>;
}
