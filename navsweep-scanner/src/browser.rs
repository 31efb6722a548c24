//! Browsing contexts the crawl drives.
//!
//! `Browser` hands out isolated `BrowsingContext`s. The crawl only ever talks to
//! these traits, so any automation surface can sit behind them. `HttpBrowser`
//! is the built-in one: every context is its own HTTP client with its own
//! cookie jar, and DOM reads parse the last loaded document.

use crate::error::{Result, ScanError};
use crate::extract::{self, MenuSelectors, MenuSnapshot, NavEntry};
use crate::result::NavigationOutcome;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;

/// Opens isolated browsing contexts.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn open_context(&self) -> Result<Box<dyn BrowsingContext>>;
}

/// A single, independently navigable unit of browser state (a tab).
#[async_trait]
pub trait BrowsingContext: Send + Sync {
    /// Load `url`, failing with `ScanError::Timeout` or `ScanError::HttpError`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationOutcome>;

    /// Read all top-level menu items in one pass over the current document.
    async fn query_anchors(&self, selectors: &MenuSelectors) -> Result<Vec<MenuSnapshot>>;

    /// Every anchor inside the regions matched by `container_selector`.
    async fn query_links(&self, container_selector: &str) -> Result<Vec<NavEntry>>;

    /// Primary heading text; `None` if the page has no such element.
    async fn heading_text(&self, heading_selector: &str) -> Result<Option<String>>;

    /// URL of the loaded document, the base for relative links.
    fn current_url(&self) -> Option<&str>;

    async fn close(self: Box<Self>) -> Result<()>;
}

/// Browser backed by plain HTTP fetches and static HTML parsing.
pub struct HttpBrowser {
    user_agent: String,
    next_id: AtomicUsize,
    active: Arc<AtomicUsize>,
}

impl HttpBrowser {
    pub fn new() -> Self {
        Self {
            user_agent: "navsweep/0.1 (+https://github.com/navsweep/navsweep)".to_string(),
            next_id: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Contexts opened and not yet closed.
    pub fn active_contexts(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn build_client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .cookie_store(true)
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(client)
    }
}

impl Default for HttpBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn open_context(&self) -> Result<Box<dyn BrowsingContext>> {
        let client = self.build_client()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
        debug!("Opened browsing context {}", id);

        Ok(Box::new(HttpContext {
            id,
            client,
            page: None,
            active: self.active.clone(),
        }))
    }
}

struct LoadedPage {
    url: String,
    html: String,
}

pub struct HttpContext {
    id: usize,
    client: Client,
    page: Option<LoadedPage>,
    active: Arc<AtomicUsize>,
}

impl HttpContext {
    fn html(&self) -> Result<&str> {
        self.page
            .as_ref()
            .map(|p| p.html.as_str())
            .ok_or(ScanError::NoPageLoaded)
    }
}

#[async_trait]
impl BrowsingContext for HttpContext {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationOutcome> {
        let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
        debug!("Context {} navigating to {}", self.id, parsed);

        // A failed navigation leaves no document behind
        self.page = None;

        let start = Instant::now();
        let client = self.client.clone();
        let fetch = async move {
            let response = client.get(parsed).send().await?;
            let status_code = response.status().as_u16();
            let final_url = response.url().to_string();
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status_code, final_url, content_type, body))
        };

        let (status_code, final_url, content_type, body) = tokio::time::timeout(timeout, fetch)
            .await
            .map_err(|_| ScanError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })??;

        let mut outcome = NavigationOutcome::new(url.to_string());
        outcome.final_url = final_url.clone();
        outcome.status_code = status_code;
        outcome.content_type = content_type;
        outcome.response_time = start.elapsed();

        if status_code >= 400 {
            warn!("{} answered with status {}", url, status_code);
        }

        self.page = Some(LoadedPage {
            url: final_url,
            html: body,
        });
        Ok(outcome)
    }

    async fn query_anchors(&self, selectors: &MenuSelectors) -> Result<Vec<MenuSnapshot>> {
        extract::extract_menu_snapshots(self.html()?, selectors)
    }

    async fn query_links(&self, container_selector: &str) -> Result<Vec<NavEntry>> {
        extract::extract_links(self.html()?, container_selector)
    }

    async fn heading_text(&self, heading_selector: &str) -> Result<Option<String>> {
        extract::extract_heading(self.html()?, heading_selector)
    }

    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.url.as_str())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        debug!("Closed browsing context {}", self.id);
        Ok(())
    }
}

// Released here so a context dropped mid-crawl is still accounted for
impl Drop for HttpContext {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
