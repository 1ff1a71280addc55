//! Plain HTTP browsing session.
//!
//! Pages are downloaded with `reqwest` and links are "clicked" by looking up
//! their `href` in the current markup and navigating to it. No script runs,
//! so this backend assumes every element an extractor reads is present in the
//! served document. Pages that render their content client-side need
//! `--backend chromium`.

use super::{Launcher, PageFetcher, SessionConfig};
use crate::error::ScrapeError;
use crate::models::RenderedPage;
use crate::utils::{LinkMatch, find_link_href, truncate_for_log};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};
use url::Url;

/// Launches [`HttpSession`]s sharing one timeout and settle configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpLauncher {
    config: SessionConfig,
}

impl HttpLauncher {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl Launcher for HttpLauncher {
    type Session = HttpSession;

    async fn launch(&self) -> Result<HttpSession, ScrapeError> {
        let client = build_client(self.config.timeout)?;
        info!(settle = ?self.config.settle, "Opened HTTP session");
        Ok(HttpSession {
            client,
            settle: self.config.settle,
            current: None,
        })
    }
}

/// Build the HTTP client every session uses.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, ScrapeError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("mars_scrape/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ScrapeError::Browser(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and return the final URL (after redirects) with the body.
pub(crate) async fn get_text(client: &Client, url: &str) -> Result<(String, String), ScrapeError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ScrapeError::from_reqwest(url, e))?;
    let final_url = response.url().to_string();
    let body = response
        .text()
        .await
        .map_err(|e| ScrapeError::from_reqwest(url, e))?;
    Ok((final_url, body))
}

#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    settle: Duration,
    current: Option<RenderedPage>,
}

impl HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<RenderedPage, ScrapeError> {
        let (final_url, html) = get_text(&self.client, url).await?;
        sleep(self.settle).await;
        debug!(url = %final_url, bytes = html.len(), "Page settled");
        let page = RenderedPage {
            url: final_url,
            html,
        };
        self.current = Some(page.clone());
        Ok(page)
    }

    async fn follow(&mut self, text: &str, mode: LinkMatch) -> Result<(), ScrapeError> {
        let page = self
            .current
            .as_ref()
            .ok_or_else(|| ScrapeError::Browser("no page loaded".to_string()))?;
        let href = find_link_href(&page.html, text, mode).ok_or_else(|| {
            debug!(%text, page = %truncate_for_log(&page.html, 200), "No matching link");
            ScrapeError::LinkNotFound {
                text: text.to_string(),
                url: page.url.clone(),
            }
        })?;
        let target = Url::parse(&page.url)
            .and_then(|base| base.join(&href))
            .map_err(|e| ScrapeError::Browser(format!("bad link {href:?} on {}: {e}", page.url)))?;
        debug!(%text, ?mode, target = %target, "Following link");
        self.navigate(target.as_str()).await?;
        Ok(())
    }
}

impl PageFetcher for HttpSession {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&mut self, url: &str) -> Result<RenderedPage, ScrapeError> {
        self.navigate(url).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_static(&mut self, url: &str) -> Result<String, ScrapeError> {
        let (_, html) = get_text(&self.client, url).await?;
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
        info!("Closed HTTP session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config() -> SessionConfig {
        SessionConfig {
            settle: Duration::ZERO,
            timeout: Duration::from_secs(5),
        }
    }

    async fn serve(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_follow_links_round_trip() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/",
            r#"<html><body><a href="detail.html"><h3>Cerberus Hemisphere Enhanced</h3></a></body></html>"#,
        )
        .await;
        serve(
            &server,
            "/detail.html",
            r#"<html><body><a href="images/full.jpg">Sample</a><a href="index.html">Back</a></body></html>"#,
        )
        .await;
        serve(&server, "/index.html", "<html><body>index</body></html>").await;

        let mut session = HttpLauncher::new(fast_config()).launch().await.unwrap();
        let index_url = format!("{}/", server.uri());
        session.fetch(&index_url).await.unwrap();

        session.follow_link_by_partial_text("Cerberus").await.unwrap();
        let detail = session.current_page().await.unwrap();
        assert_eq!(detail.url, format!("{}/detail.html", server.uri()));
        assert!(detail.html.contains("Sample"));

        session.follow_link_by_text("Back").await.unwrap();
        let back = session.current_page().await.unwrap();
        assert!(back.html.contains("index"));

        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_link_is_reported() {
        let server = MockServer::start().await;
        serve(&server, "/", "<html><body><a href=\"x\">Other</a></body></html>").await;

        let mut session = HttpLauncher::new(fast_config()).launch().await.unwrap();
        session.fetch(&format!("{}/", server.uri())).await.unwrap();

        let err = session.follow_link_by_text("Sample").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LinkNotFound);
    }

    #[tokio::test]
    async fn test_fetch_static_keeps_current_page() {
        let server = MockServer::start().await;
        serve(&server, "/", "<p>home</p>").await;
        serve(&server, "/table", "<table><tr><td>x</td></tr></table>").await;

        let mut session = HttpLauncher::new(fast_config()).launch().await.unwrap();
        session.fetch(&format!("{}/", server.uri())).await.unwrap();
        let raw = session
            .fetch_static(&format!("{}/table", server.uri()))
            .await
            .unwrap();

        assert!(raw.contains("<table>"));
        let current = session.current_page().await.unwrap();
        assert!(current.html.contains("home"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut session = HttpLauncher::new(fast_config()).launch().await.unwrap();
        let err = session.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Http);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let config = SessionConfig {
            settle: Duration::ZERO,
            timeout: Duration::from_millis(50),
        };
        let mut session = HttpLauncher::new(config).launch().await.unwrap();
        let err = session.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchTimeout);
    }
}
