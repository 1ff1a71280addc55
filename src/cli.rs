//! Command-line interface definitions for Mars Scrape.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also be provided through an environment variable.

use crate::scrapers::{facts, hemispheres, image, news};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the Mars Scrape application.
///
/// # Examples
///
/// ```sh
/// # Scrape all four sources and store the snapshot
/// mars_scrape scrape
///
/// # Use headless Chromium and a custom store location
/// mars_scrape --store ./data/mars.json scrape --backend chromium
///
/// # Print the facts table of the stored snapshot as HTML
/// mars_scrape show --html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON document holding the latest snapshot
    #[arg(short, long, env = "MARS_STORE_PATH", default_value = "mars_snapshot.json")]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape every source and replace the stored snapshot
    Scrape {
        /// Browser backend used to visit the pages
        #[arg(short, long, value_enum, env = "MARS_BACKEND", default_value_t = Backend::Http)]
        backend: Backend,

        /// Milliseconds to wait after each navigation before reading the page
        #[arg(long, env = "MARS_SETTLE_MS", default_value_t = 1000)]
        settle_ms: u64,

        /// Per-request timeout in seconds
        #[arg(long, env = "MARS_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,

        #[command(flatten)]
        sources: Sources,
    },

    /// Print the latest stored snapshot
    Show {
        /// Print only the facts table, rendered as HTML
        #[arg(long)]
        html: bool,
    },
}

/// Page each stage reads from, e.g. to point a run at a local mirror.
#[derive(Args, Debug, Clone)]
pub struct Sources {
    #[arg(long, env = "MARS_NEWS_URL", default_value = news::NEWS_URL)]
    pub news_url: String,

    #[arg(long, env = "MARS_IMAGE_URL", default_value = image::IMAGE_URL)]
    pub image_url: String,

    #[arg(long, env = "MARS_FACTS_URL", default_value = facts::FACTS_URL)]
    pub facts_url: String,

    #[arg(long, env = "MARS_HEMISPHERES_URL", default_value = hemispheres::HEMISPHERES_URL)]
    pub hemispheres_url: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Plain HTTP requests; links are followed by their href
    Http,
    /// Headless Chromium (requires the `chromium` feature)
    Chromium,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_defaults() {
        let cli = Cli::parse_from(["mars_scrape", "scrape"]);

        assert_eq!(cli.store, PathBuf::from("mars_snapshot.json"));
        match cli.command {
            Command::Scrape {
                backend,
                settle_ms,
                timeout_secs,
                sources,
            } => {
                assert_eq!(backend, Backend::Http);
                assert_eq!(settle_ms, 1000);
                assert_eq!(timeout_secs, 30);
                assert_eq!(sources.news_url, news::NEWS_URL);
                assert_eq!(sources.hemispheres_url, hemispheres::HEMISPHERES_URL);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_scrape_flags() {
        let cli = Cli::parse_from([
            "mars_scrape",
            "-s",
            "/tmp/mars.json",
            "scrape",
            "--backend",
            "chromium",
            "--settle-ms",
            "250",
            "--facts-url",
            "http://localhost:8080/facts.html",
        ]);

        assert_eq!(cli.store, PathBuf::from("/tmp/mars.json"));
        match cli.command {
            Command::Scrape {
                backend,
                settle_ms,
                sources,
                ..
            } => {
                assert_eq!(backend, Backend::Chromium);
                assert_eq!(settle_ms, 250);
                assert_eq!(sources.facts_url, "http://localhost:8080/facts.html");
                assert_eq!(sources.image_url, image::IMAGE_URL);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_show_html() {
        let cli = Cli::parse_from(["mars_scrape", "show", "--html"]);
        assert!(matches!(cli.command, Command::Show { html: true }));
    }
}
