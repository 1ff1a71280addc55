//! Extractors for the four Mars sources.
//!
//! Each submodule knows how to read exactly one page and returns one typed
//! fact or a [`ScrapeError`](crate::error::ScrapeError). Extractors fail fast
//! and never swallow an error.
//!
//! # Sources
//!
//! | Fact | Module | Default URL | Input |
//! |------|--------|-------------|-------|
//! | Latest news | [`news`] | `https://redplanetscience.com/` | rendered page |
//! | Featured image | [`image`] | `https://spaceimages-mars.com/` | rendered page |
//! | Facts table | [`facts`] | `https://galaxyfacts-mars.com/` | raw page source |
//! | Hemispheres | [`hemispheres`] | `https://marshemispheres.com/` | live session |
//!
//! # Selection policy
//!
//! Whenever a selector can match several elements the extractor takes the
//! first one in document order. Nothing tries to pick a "best" match.

pub mod facts;
pub mod hemispheres;
pub mod image;
pub mod news;
