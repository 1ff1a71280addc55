//! Error types for the scrape pipeline and the snapshot store.
//!
//! Extractors and sessions return [`ScrapeError`]. The orchestrator wraps the
//! first failure in [`ScrapeError::Stage`] so callers learn both what went
//! wrong ([`ErrorKind`]) and where ([`Stage`]).

use std::fmt;
use thiserror::Error;

/// The four scrape stages, in the order the orchestrator runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    News,
    FeaturedImage,
    FactsTable,
    Hemispheres,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::News => "news",
            Stage::FeaturedImage => "featured_image",
            Stage::FactsTable => "facts_table",
            Stage::Hemispheres => "hemispheres",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a [`ScrapeError`], stable across wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingElement,
    LinkNotFound,
    NoTableFound,
    MalformedTable,
    NavigationFailed,
    RunAlreadyInProgress,
    FetchTimeout,
    Http,
    Browser,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("missing element `{selector}` on {url}")]
    MissingElement { selector: String, url: String },

    #[error("no link with text {text:?} on {url}")]
    LinkNotFound { text: String, url: String },

    #[error("no table found on {url}")]
    NoTableFound { url: String },

    #[error("malformed table: {reason}")]
    MalformedTable { reason: String },

    #[error("navigation failed for hemisphere {hemisphere:?}")]
    NavigationFailed {
        hemisphere: String,
        #[source]
        source: Box<ScrapeError>,
    },

    #[error("a scrape run is already in progress")]
    RunAlreadyInProgress,

    #[error("timed out fetching {url}")]
    FetchTimeout { url: String },

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("{stage} stage failed")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<ScrapeError>,
    },
}

impl ScrapeError {
    /// Kind of the underlying failure. A stage wrapper reports the kind of the
    /// error it wraps; a navigation failure stays `NavigationFailed`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::MissingElement { .. } => ErrorKind::MissingElement,
            ScrapeError::LinkNotFound { .. } => ErrorKind::LinkNotFound,
            ScrapeError::NoTableFound { .. } => ErrorKind::NoTableFound,
            ScrapeError::MalformedTable { .. } => ErrorKind::MalformedTable,
            ScrapeError::NavigationFailed { .. } => ErrorKind::NavigationFailed,
            ScrapeError::RunAlreadyInProgress => ErrorKind::RunAlreadyInProgress,
            ScrapeError::FetchTimeout { .. } => ErrorKind::FetchTimeout,
            ScrapeError::Http { .. } => ErrorKind::Http,
            ScrapeError::Browser(_) => ErrorKind::Browser,
            ScrapeError::Stage { source, .. } => source.kind(),
        }
    }

    /// The stage that produced this error, if it came out of the orchestrator.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ScrapeError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub(crate) fn in_stage(self, stage: Stage) -> Self {
        ScrapeError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ScrapeError::FetchTimeout {
                url: url.to_string(),
            }
        } else {
            ScrapeError::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Failures reading or writing the persisted snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot store I/O failed at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot could not be (de)serialized")]
    Serde(#[from] serde_json::Error),
}

/// Failure of a scrape-and-store request: either the run or the write broke.
///
/// In both cases the previously stored snapshot is left in place.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
