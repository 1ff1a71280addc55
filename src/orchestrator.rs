//! Runs the four extractors against one browser session.
//!
//! A run launches a session, visits the sources in a fixed order
//! (news → featured image → facts table → hemispheres), stamps the snapshot
//! and closes the session whether or not a stage failed. The first failing
//! stage aborts the run; no partial snapshot is ever returned or stored.
//!
//! Runs on one orchestrator are serialized: while a run is in flight, a
//! second call to [`ScrapeOrchestrator::run`] is rejected with
//! [`ScrapeError::RunAlreadyInProgress`] rather than queued.

use crate::browser::{Launcher, PageFetcher};
use crate::error::{ScrapeError, Stage, TriggerError};
use crate::models::{FactsTable, ImageFact, MarsSnapshot, NewsFact};
use crate::outputs::AggregateStore;
use crate::scrapers::{facts, hemispheres, image, news};
use chrono::Utc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Where each stage reads from. Defaults to the live Mars sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub news: String,
    pub image: String,
    pub facts: String,
    pub hemispheres: String,
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            news: news::NEWS_URL.to_string(),
            image: image::IMAGE_URL.to_string(),
            facts: facts::FACTS_URL.to_string(),
            hemispheres: hemispheres::HEMISPHERES_URL.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ScrapeOrchestrator<L: Launcher> {
    launcher: L,
    urls: SourceUrls,
    run_guard: Mutex<()>,
}

impl<L: Launcher> ScrapeOrchestrator<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            urls: SourceUrls::default(),
            run_guard: Mutex::new(()),
        }
    }

    pub fn with_urls(mut self, urls: SourceUrls) -> Self {
        self.urls = urls;
        self
    }

    /// Scrape every source and assemble a [`MarsSnapshot`].
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RunAlreadyInProgress`] if another run is in flight
    /// - the launcher's error if no session could be opened
    /// - [`ScrapeError::Stage`] wrapping the first stage failure
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> Result<MarsSnapshot, ScrapeError> {
        let _running = self.run_guard.try_lock().map_err(|_| {
            warn!("Rejected scrape: another run is in progress");
            ScrapeError::RunAlreadyInProgress
        })?;

        let start_time = Instant::now();
        let mut session = self.launcher.launch().await?;
        let outcome = self.scrape(&mut session).await;
        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to close browser session");
        }

        let elapsed = start_time.elapsed();
        match &outcome {
            Ok(snapshot) => info!(
                ?elapsed,
                hemispheres = snapshot.hemispheres.len(),
                fact_rows = snapshot.facts.rows.len(),
                "Scrape complete"
            ),
            Err(e) => error!(
                ?elapsed,
                stage = ?e.stage(),
                kind = ?e.kind(),
                error = %e,
                "Scrape failed"
            ),
        }
        outcome
    }

    /// Run a scrape and, only if it succeeds, replace the stored snapshot.
    pub async fn run_and_store<S: AggregateStore>(
        &self,
        store: &S,
    ) -> Result<MarsSnapshot, TriggerError> {
        let snapshot = self.run().await?;
        store.put(&snapshot).await?;
        Ok(snapshot)
    }

    async fn scrape(&self, session: &mut L::Session) -> Result<MarsSnapshot, ScrapeError> {
        let news = self
            .scrape_news(session)
            .await
            .map_err(|e| e.in_stage(Stage::News))?;
        let image = self
            .scrape_image(session)
            .await
            .map_err(|e| e.in_stage(Stage::FeaturedImage))?;
        let facts = self
            .scrape_facts(session)
            .await
            .map_err(|e| e.in_stage(Stage::FactsTable))?;
        let hemispheres = hemispheres::extract(session, &self.urls.hemispheres)
            .await
            .map_err(|e| e.in_stage(Stage::Hemispheres))?;

        Ok(MarsSnapshot {
            news,
            image,
            facts,
            hemispheres,
            captured_at: Utc::now(),
        })
    }

    async fn scrape_news(&self, session: &mut L::Session) -> Result<NewsFact, ScrapeError> {
        let page = session.fetch(&self.urls.news).await?;
        news::extract(&page)
    }

    async fn scrape_image(&self, session: &mut L::Session) -> Result<ImageFact, ScrapeError> {
        let page = session.fetch(&self.urls.image).await?;
        image::extract(&page)
    }

    // Read from the raw source, not the rendered session.
    async fn scrape_facts(&self, session: &mut L::Session) -> Result<FactsTable, ScrapeError> {
        let html = session.fetch_static(&self.urls.facts).await?;
        facts::extract(&self.urls.facts, &html)
    }
}
