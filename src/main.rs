//! # Mars Scrape
//!
//! Collects the latest facts about Mars from four public sites and keeps the
//! most recent result as a single JSON snapshot.
//!
//! ## Sources
//!
//! - Latest headline and teaser from Red Planet Science
//! - Featured full-size image from Space Images
//! - Mars/Earth comparison table from Galaxy Facts
//! - Full-resolution images of the four hemispheres from Mars Hemispheres
//!
//! ## Usage
//!
//! ```sh
//! mars_scrape scrape          # scrape and replace the stored snapshot
//! mars_scrape show            # print the stored snapshot as JSON
//! mars_scrape show --html     # print the facts table as an HTML table
//! ```
//!
//! ## Architecture
//!
//! 1. **Session**: one browser session per run (`browser`)
//! 2. **Extraction**: one extractor per source, run in a fixed order (`scrapers`)
//! 3. **Assembly**: the orchestrator builds a `MarsSnapshot`, all or nothing
//! 4. **Storage**: the snapshot replaces the previous one on disk (`outputs`)

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod error;
mod models;
mod orchestrator;
mod outputs;
mod scrapers;
#[cfg(test)]
mod testing;
mod utils;

use browser::http::HttpLauncher;
use browser::{Launcher, SessionConfig};
use cli::{Backend, Cli, Command};
use orchestrator::{ScrapeOrchestrator, SourceUrls};
use outputs::AggregateStore;
use outputs::html::facts_table_to_html;
use outputs::json::JsonFileStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let store = JsonFileStore::new(&args.store);

    match args.command {
        Command::Scrape {
            backend,
            settle_ms,
            timeout_secs,
            sources,
        } => {
            let config = SessionConfig {
                settle: Duration::from_millis(settle_ms),
                timeout: Duration::from_secs(timeout_secs),
            };
            let urls = SourceUrls {
                news: sources.news_url,
                image: sources.image_url,
                facts: sources.facts_url,
                hemispheres: sources.hemispheres_url,
            };
            info!(?backend, store = %store.path().display(), "mars_scrape starting");
            match backend {
                Backend::Http => scrape(HttpLauncher::new(config), urls, &store).await,
                #[cfg(feature = "chromium")]
                Backend::Chromium => {
                    scrape(browser::chromium::ChromiumLauncher::new(config), urls, &store).await
                }
                #[cfg(not(feature = "chromium"))]
                Backend::Chromium => {
                    error!("This build does not include the Chromium backend");
                    Err("rebuild with `--features chromium` to use the Chromium backend".into())
                }
            }
        }
        Command::Show { html } => show(&store, html).await,
    }
}

/// Run one scrape and store the snapshot. On failure the stored snapshot is
/// left untouched.
#[instrument(level = "info", skip_all)]
async fn scrape<L: Launcher>(
    launcher: L,
    urls: SourceUrls,
    store: &JsonFileStore,
) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();
    let orchestrator = ScrapeOrchestrator::new(launcher).with_urls(urls);

    match orchestrator.run_and_store(store).await {
        Ok(snapshot) => {
            let elapsed = start_time.elapsed();
            info!(
                ?elapsed,
                title = %snapshot.news.title,
                hemispheres = snapshot.hemispheres.len(),
                captured_at = %snapshot.captured_at,
                "Execution complete"
            );
            debug!(mars = ?snapshot.facts.column_pairs("Mars"), "Mars facts");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Scrape did not complete; previous snapshot kept");
            Err(e.into())
        }
    }
}

async fn show(store: &JsonFileStore, html: bool) -> Result<(), Box<dyn Error>> {
    let Some(snapshot) = store.get_latest().await? else {
        info!(store = %store.path().display(), "No snapshot stored yet");
        println!("No snapshot stored yet. Run `mars_scrape scrape` first.");
        return Ok(());
    };

    if html {
        print!("{}", facts_table_to_html(&snapshot.facts));
    } else {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}
