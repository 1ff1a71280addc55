//! Offline test doubles: saved pages and an in-memory browsing session.

use crate::browser::{Launcher, PageFetcher};
use crate::error::ScrapeError;
use crate::models::RenderedPage;
use crate::scrapers::{facts::FACTS_URL, hemispheres::HEMISPHERES_URL, image::IMAGE_URL, news::NEWS_URL};
use crate::utils::{LinkMatch, find_link_href};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

pub mod fixtures {
    pub const NEWS: &str = include_str!("../fixtures/news.html");
    pub const IMAGE: &str = include_str!("../fixtures/image.html");
    pub const FACTS: &str = include_str!("../fixtures/facts.html");
    pub const HEMISPHERES_INDEX: &str = include_str!("../fixtures/hemispheres_index.html");
    pub const CERBERUS: &str = include_str!("../fixtures/cerberus_enhanced.html");
    pub const SCHIAPARELLI: &str = include_str!("../fixtures/schiaparelli_enhanced.html");
    pub const SYRTIS_MAJOR: &str = include_str!("../fixtures/syrtis_major_enhanced.html");
    pub const VALLES_MARINERIS: &str = include_str!("../fixtures/valles_marineris_enhanced.html");
    pub const HEMISPHERE_WITHOUT_SAMPLE: &str =
        include_str!("../fixtures/hemisphere_without_sample.html");
}

/// Navigation log entry for a raw `fetch_static` read of `url`.
pub fn static_entry(url: &str) -> String {
    format!("static:{url}")
}

/// Serves saved pages by exact URL and follows links the way
/// [`HttpSession`](crate::browser::http::HttpSession) does.
#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pages: HashMap<String, String>,
    current: Option<RenderedPage>,
    log: Arc<Mutex<Vec<String>>>,
    delay: Duration,
    closes: Arc<AtomicUsize>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every page a full run visits, keyed by the live URLs.
    pub fn with_fixtures() -> Self {
        Self::new()
            .with_page(NEWS_URL, fixtures::NEWS)
            .with_page(IMAGE_URL, fixtures::IMAGE)
            .with_page(FACTS_URL, fixtures::FACTS)
            .with_page(HEMISPHERES_URL, fixtures::HEMISPHERES_INDEX)
            .with_page("https://marshemispheres.com/index.html", fixtures::HEMISPHERES_INDEX)
            .with_page("https://marshemispheres.com/cerberus_enhanced.html", fixtures::CERBERUS)
            .with_page(
                "https://marshemispheres.com/schiaparelli_enhanced.html",
                fixtures::SCHIAPARELLI,
            )
            .with_page(
                "https://marshemispheres.com/syrtis_major_enhanced.html",
                fixtures::SYRTIS_MAJOR,
            )
            .with_page(
                "https://marshemispheres.com/valles_marineris_enhanced.html",
                fixtures::VALLES_MARINERIS,
            )
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn without_page(mut self, url: &str) -> Self {
        self.pages.remove(url);
        self
    }

    /// Wait this long on every navigation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// URLs requested, in order, by this session and its clones. Raw
    /// `fetch_static` reads are recorded as `static:<url>`.
    pub fn navigation_log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn lookup(&self, url: &str) -> Result<String, ScrapeError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Browser(format!("no fixture for {url}")))
    }

    async fn navigate(&mut self, url: &str) -> Result<RenderedPage, ScrapeError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let html = self.lookup(url)?;
        self.log.lock().unwrap().push(url.to_string());
        let page = RenderedPage {
            url: url.to_string(),
            html,
        };
        self.current = Some(page.clone());
        Ok(page)
    }

    async fn follow(&mut self, text: &str, mode: LinkMatch) -> Result<(), ScrapeError> {
        let page = self.current_page().await?;
        let href = find_link_href(&page.html, text, mode).ok_or_else(|| ScrapeError::LinkNotFound {
            text: text.to_string(),
            url: page.url.clone(),
        })?;
        let target = Url::parse(&page.url)
            .and_then(|base| base.join(&href))
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;
        self.navigate(target.as_str()).await?;
        Ok(())
    }
}

impl PageFetcher for FakeSession {
    async fn fetch(&mut self, url: &str) -> Result<RenderedPage, ScrapeError> {
        self.navigate(url).await
    }

    async fn fetch_static(&mut self, url: &str) -> Result<String, ScrapeError> {
        let html = self.lookup(url)?;
        self.log.lock().unwrap().push(static_entry(url));
        Ok(html)
    }

    async fn current_page(&mut self) -> Result<RenderedPage, ScrapeError> {
        self.current
            .clone()
            .ok_or_else(|| ScrapeError::Browser("no page loaded".to_string()))
    }

    async fn follow_link_by_text(&mut self, text: &str) -> Result<(), ScrapeError> {
        self.follow(text, LinkMatch::Exact).await
    }

    async fn follow_link_by_partial_text(&mut self, text: &str) -> Result<(), ScrapeError> {
        self.follow(text, LinkMatch::Partial).await
    }

    async fn close(self) -> Result<(), ScrapeError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out copies of a template [`FakeSession`] and counts launches and
/// closes across all of them.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    template: FakeSession,
    launches: Arc<AtomicUsize>,
    fail_launch: bool,
}

impl FakeLauncher {
    pub fn new(template: FakeSession) -> Self {
        Self {
            template,
            launches: Arc::new(AtomicUsize::new(0)),
            fail_launch: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.template.closes.load(Ordering::SeqCst)
    }

    pub fn navigation_log(&self) -> Vec<String> {
        self.template.navigation_log()
    }
}

impl Launcher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, ScrapeError> {
        if self.fail_launch {
            return Err(ScrapeError::Browser("browser failed to start".to_string()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(self.template.clone())
    }
}
