//! Headless Chromium session, for pages whose content is rendered client-side.
//!
//! Each run launches its own browser process. Dropping the session kills the
//! child process, so an aborted run still releases it.

use super::http::{build_client, get_text};
use super::{Launcher, PageFetcher, SessionConfig};
use crate::error::ScrapeError;
use crate::models::RenderedPage;
use crate::utils::{LinkMatch, normalize_text};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use reqwest::Client;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    config: SessionConfig,
}

impl ChromiumLauncher {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl Launcher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession, ScrapeError> {
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.config.timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(ScrapeError::Browser)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        info!(settle = ?self.config.settle, "Launched Chromium session");
        Ok(ChromiumSession {
            browser,
            page,
            handler,
            client: build_client(self.config.timeout)?,
            config: self.config,
        })
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    client: Client,
    config: SessionConfig,
}

impl ChromiumSession {
    async fn bounded<T, E, F>(&self, url: &str, fut: F) -> Result<T, ScrapeError>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.config.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ScrapeError::Browser(e.to_string())),
            Err(_) => Err(ScrapeError::FetchTimeout {
                url: url.to_string(),
            }),
        }
    }

    async fn page_url(&self) -> Result<String, ScrapeError> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn follow(&mut self, text: &str, mode: LinkMatch) -> Result<(), ScrapeError> {
        let url = self.page_url().await?;
        let anchors = self
            .page
            .find_elements("a[href]")
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        for anchor in anchors {
            let visible = anchor
                .inner_text()
                .await
                .map_err(|e| ScrapeError::Browser(e.to_string()))?
                .unwrap_or_default();
            if !mode.matches(&normalize_text(&visible), text) {
                continue;
            }

            debug!(%text, ?mode, %url, "Clicking link");
            self.bounded(&url, anchor.click()).await?;
            self.bounded(&url, self.page.wait_for_navigation()).await?;
            sleep(self.config.settle).await;
            return Ok(());
        }

        Err(ScrapeError::LinkNotFound {
            text: text.to_string(),
            url,
        })
    }
}

impl PageFetcher for ChromiumSession {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&mut self, url: &str) -> Result<RenderedPage, ScrapeError> {
        self.bounded(url, self.page.goto(url)).await?;
        sleep(self.config.settle).await;
        self.current_page().await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_static(&mut self, url: &str) -> Result<String, ScrapeError> {
        let (_, html) = get_text(&self.client, url).await?;
        Ok(html)
    }

    async fn current_page(&mut self) -> Result<RenderedPage, ScrapeError> {
        let html = self
            .page
            .content()
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let url = self.page_url().await?;
        Ok(RenderedPage { url, html })
    }

    async fn follow_link_by_text(&mut self, text: &str) -> Result<(), ScrapeError> {
        self.follow(text, LinkMatch::Exact).await
    }

    async fn follow_link_by_partial_text(&mut self, text: &str) -> Result<(), ScrapeError> {
        self.follow(text, LinkMatch::Partial).await
    }

    async fn close(mut self) -> Result<(), ScrapeError> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Chromium did not exit cleanly");
        }
        self.handler.abort();
        closed.map_err(|e| ScrapeError::Browser(e.to_string()))?;
        info!("Closed Chromium session");
        Ok(())
    }
}
