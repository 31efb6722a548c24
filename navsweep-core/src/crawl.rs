use crate::config::CrawlConfig;
use crate::duplicates::{DuplicateRecord, DuplicatesSummary, detect_duplicates};
use crate::matcher::{MatchStrategy, TitleMatcher};
use indicatif::{ProgressBar, ProgressStyle};
use navsweep_scanner::extract::parse_selector;
use navsweep_scanner::resolver::resolve_entries;
use navsweep_scanner::{
    Browser, BrowsingContext, HttpBrowser, MenuSnapshot, ResolvedLink, ScanError, resolve_url,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const FOOTER_LABEL: &str = "Footer";

/// Failures that make the whole crawl meaningless. Per-link problems never end up here.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("The primary browsing context has no page loaded")]
    NoBaseUrl,

    #[error("No top-level menu items matched '{selector}'")]
    NoMenusFound { selector: String },

    #[error("No links matched '{selector}'")]
    NoLinksFound { selector: String },

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Which navigation structure a crawl walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlKind {
    Menu,
    Footer,
}

impl fmt::Display for CrawlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlKind::Menu => f.write_str("menu"),
            CrawlKind::Footer => f.write_str("footer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckOutcome {
    Matched {
        strategy: MatchStrategy,
        snippet: String,
    },
    Mismatch {
        heading: Option<String>,
    },
    NavigationFailed {
        error: String,
    },
}

/// Result of opening one destination and checking its heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCheck {
    pub label: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl PageCheck {
    fn failed(label: &str, url: &str, err: &ScanError) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
            status_code: None,
            outcome: CheckOutcome::NavigationFailed {
                error: err.to_string(),
            },
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Matched { .. })
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Mismatch { .. })
    }

    pub fn is_navigation_failure(&self) -> bool {
        matches!(self.outcome, CheckOutcome::NavigationFailed { .. })
    }
}

/// Everything learned about one top-level menu item (or the footer group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuReport {
    pub label: String,
    pub url: Option<String>,
    pub skipped: bool,
    pub title_check: Option<PageCheck>,
    pub links: Vec<PageCheck>,
    pub duplicates: Vec<DuplicateRecord>,
    /// Sublinks without a resolvable href.
    pub dropped_links: usize,
}

impl MenuReport {
    fn skipped(label: String) -> Self {
        Self {
            label,
            url: None,
            skipped: true,
            title_check: None,
            links: Vec::new(),
            duplicates: Vec::new(),
            dropped_links: 0,
        }
    }

    /// The menu's own check followed by its links, in visit order.
    pub fn checks(&self) -> impl Iterator<Item = &PageCheck> {
        self.title_check.iter().chain(self.links.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub base_url: String,
    pub kind: CrawlKind,
    pub menus: Vec<MenuReport>,
    pub duplicates: DuplicatesSummary,
}

impl CrawlSummary {
    pub fn new(base_url: String, kind: CrawlKind) -> Self {
        Self {
            base_url,
            kind,
            menus: Vec::new(),
            duplicates: DuplicatesSummary::new(),
        }
    }

    fn push(&mut self, report: MenuReport) {
        self.duplicates.record(&report.label, &report.duplicates);
        self.menus.push(report);
    }

    pub fn checks(&self) -> impl Iterator<Item = &PageCheck> {
        self.menus.iter().flat_map(MenuReport::checks)
    }

    pub fn total_checks(&self) -> usize {
        self.checks().count()
    }

    pub fn passed(&self) -> usize {
        self.checks().filter(|c| c.passed()).count()
    }

    pub fn mismatched(&self) -> usize {
        self.checks().filter(|c| c.is_mismatch()).count()
    }

    pub fn failed_navigations(&self) -> usize {
        self.checks().filter(|c| c.is_navigation_failure()).count()
    }

    pub fn skipped_menus(&self) -> usize {
        self.menus.iter().filter(|m| m.skipped).count()
    }

    pub fn has_failures(&self) -> bool {
        self.mismatched() > 0 || self.failed_navigations() > 0
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Walks a site's navigation, one destination at a time.
///
/// Menus and links are visited strictly in DOM order; every destination is
/// opened in an auxiliary context so the primary context never moves.
pub struct MenuCrawler {
    browser: Arc<dyn Browser>,
    config: CrawlConfig,
    matcher: TitleMatcher,
    progress_callback: Option<CrawlProgressCallback>,
}

impl MenuCrawler {
    pub fn new(browser: Arc<dyn Browser>, config: CrawlConfig) -> Self {
        let matcher = config.matcher.to_matcher();
        Self {
            browser,
            config,
            matcher,
            progress_callback: None,
        }
    }

    pub fn with_matcher(mut self, matcher: TitleMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_progress_callback(mut self, callback: CrawlProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report_progress(&self, message: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(message);
        }
    }

    pub async fn run(
        &self,
        kind: CrawlKind,
        primary: &dyn BrowsingContext,
    ) -> Result<CrawlSummary, CrawlError> {
        match kind {
            CrawlKind::Menu => self.crawl_menus(primary).await,
            CrawlKind::Footer => self.crawl_footer(primary).await,
        }
    }

    /// Validate every top-level menu item and its sublinks.
    ///
    /// `primary` must already show the page whose navigation is crawled.
    pub async fn crawl_menus(
        &self,
        primary: &dyn BrowsingContext,
    ) -> Result<CrawlSummary, CrawlError> {
        let base_url = primary.current_url().ok_or(CrawlError::NoBaseUrl)?.to_string();
        parse_selector(&self.config.selectors.heading)?;
        let snapshots = primary.query_anchors(&self.config.selectors).await?;

        if snapshots.is_empty() {
            return Err(CrawlError::NoMenusFound {
                selector: self.config.selectors.top_level_items.clone(),
            });
        }
        info!("Found {} menus on {}", snapshots.len(), base_url);

        let mut summary = CrawlSummary::new(base_url.clone(), CrawlKind::Menu);
        let total = snapshots.len();
        for (idx, snapshot) in snapshots.into_iter().enumerate() {
            self.report_progress(format!(
                "Menu {}/{}: {}",
                idx + 1,
                total,
                snapshot.main_label
            ));
            let report = self.crawl_menu(&base_url, snapshot).await?;
            summary.push(report);
        }

        log_summary(&summary);
        Ok(summary)
    }

    /// Validate every link in the footer as a single group.
    pub async fn crawl_footer(
        &self,
        primary: &dyn BrowsingContext,
    ) -> Result<CrawlSummary, CrawlError> {
        let base_url = primary.current_url().ok_or(CrawlError::NoBaseUrl)?.to_string();
        parse_selector(&self.config.selectors.heading)?;
        let selector = &self.config.selectors.footer_links;
        let entries = primary.query_links(selector).await?;

        if entries.is_empty() {
            return Err(CrawlError::NoLinksFound {
                selector: selector.clone(),
            });
        }
        info!("Found {} footer links on {}", entries.len(), base_url);

        let (resolved, dropped_links) = resolve_entries(&entries, &base_url);
        let scan = detect_duplicates(resolved);
        log_duplicates(FOOTER_LABEL, &scan.duplicates);
        let links = self.check_links(FOOTER_LABEL, &scan.all_entries).await?;

        let mut summary = CrawlSummary::new(base_url, CrawlKind::Footer);
        summary.push(MenuReport {
            label: FOOTER_LABEL.to_string(),
            url: None,
            skipped: false,
            title_check: None,
            links,
            duplicates: scan.duplicates,
            dropped_links,
        });

        log_summary(&summary);
        Ok(summary)
    }

    async fn crawl_menu(
        &self,
        base_url: &str,
        snapshot: MenuSnapshot,
    ) -> Result<MenuReport, ScanError> {
        let MenuSnapshot {
            main_label,
            main_href,
            sublinks,
        } = snapshot;

        let Some(menu_url) = resolve_url(main_href.as_deref(), base_url) else {
            warn!(
                "Skipping menu '{}': no resolvable link ({:?})",
                main_label, main_href
            );
            return Ok(MenuReport::skipped(main_label));
        };

        info!("Checking menu '{}' -> {}", main_label, menu_url);
        let title_check = self.check_in_new_context(&main_label, &menu_url).await?;

        let (resolved, dropped_links) = resolve_entries(&sublinks, base_url);
        if dropped_links > 0 {
            warn!(
                "Menu '{}': dropped {} sublinks without a usable href",
                main_label, dropped_links
            );
        }
        let scan = detect_duplicates(resolved);
        log_duplicates(&main_label, &scan.duplicates);

        let links = self.check_links(&main_label, &scan.all_entries).await?;

        Ok(MenuReport {
            label: main_label,
            url: Some(menu_url),
            skipped: false,
            title_check: Some(title_check),
            links,
            duplicates: scan.duplicates,
            dropped_links,
        })
    }

    async fn check_in_new_context(&self, label: &str, url: &str) -> Result<PageCheck, ScanError> {
        let mut ctx = match self.browser.open_context().await {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("Could not open a browsing context for '{}': {}", label, e);
                return Ok(PageCheck::failed(label, url, &e));
            }
        };

        let check = self.check_page(ctx.as_mut(), label, url).await;
        close_context(ctx).await;
        check
    }

    /// Check `links` one after another in a single reused context.
    async fn check_links(
        &self,
        group_label: &str,
        links: &[ResolvedLink],
    ) -> Result<Vec<PageCheck>, ScanError> {
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let mut ctx = match self.browser.open_context().await {
            Ok(ctx) => ctx,
            Err(e) => {
                error!(
                    "Could not open a browsing context for links of '{}': {}",
                    group_label, e
                );
                return Ok(links
                    .iter()
                    .map(|link| PageCheck::failed(&link.label, &link.url, &e))
                    .collect());
            }
        };

        let mut checks = Vec::with_capacity(links.len());
        for (idx, link) in links.iter().enumerate() {
            self.report_progress(format!(
                "{} > {} ({}/{})",
                group_label,
                link.label,
                idx + 1,
                links.len()
            ));
            match self.check_page(ctx.as_mut(), &link.label, &link.url).await {
                Ok(check) => checks.push(check),
                Err(e) => {
                    close_context(ctx).await;
                    return Err(e);
                }
            }
        }

        close_context(ctx).await;
        Ok(checks)
    }

    /// Navigation failures become a failed check; any other error ends the crawl.
    async fn check_page(
        &self,
        ctx: &mut dyn BrowsingContext,
        label: &str,
        url: &str,
    ) -> Result<PageCheck, ScanError> {
        let timeout = self.config.navigation_timeout();
        let navigation = tokio::time::timeout(timeout, ctx.navigate(url, timeout))
            .await
            .unwrap_or_else(|_| {
                Err(ScanError::Timeout {
                    url: url.to_string(),
                    timeout_ms: duration_ms(timeout),
                })
            });

        let outcome = match navigation {
            Ok(outcome) => outcome,
            Err(e) if e.is_navigation_error() => {
                error!("✗ '{}' failed to load {}: {}", label, url, e);
                return Ok(PageCheck::failed(label, url, &e));
            }
            Err(e) => return Err(e),
        };

        let heading = match ctx.heading_text(&self.config.selectors.heading).await {
            Ok(heading) => heading,
            Err(e) if e.is_navigation_error() => {
                error!("✗ '{}' could not read heading of {}: {}", label, url, e);
                return Ok(PageCheck::failed(label, url, &e));
            }
            Err(e) => return Err(e),
        };

        let result = self.matcher.check(heading.as_deref().unwrap_or_default(), label);
        let check_outcome = match (result.strategy, result.snippet) {
            (Some(strategy), Some(snippet)) => {
                info!("✓ '{}' matched {} ({}: '{}')", label, url, strategy, snippet);
                CheckOutcome::Matched { strategy, snippet }
            }
            _ => {
                warn!(
                    "Title mismatch for '{}' at {}: heading {:?}",
                    label, url, heading
                );
                CheckOutcome::Mismatch { heading }
            }
        };

        Ok(PageCheck {
            label: label.to_string(),
            url: url.to_string(),
            status_code: Some(outcome.status_code),
            outcome: check_outcome,
        })
    }
}

async fn close_context(ctx: Box<dyn BrowsingContext>) {
    if let Err(e) = ctx.close().await {
        warn!("Failed to close browsing context: {}", e);
    }
}

fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn log_duplicates(menu_label: &str, duplicates: &[DuplicateRecord]) {
    for dup in duplicates {
        info!(
            "Duplicate in '{}': '{}' repeats '{}' ({})",
            menu_label, dup.label, dup.duplicate_of_label, dup.url
        );
    }
}

fn log_summary(summary: &CrawlSummary) {
    info!(
        "Crawl complete: {} checks, {} passed, {} mismatched, {} failed to load, {} menus skipped, {} duplicates",
        summary.total_checks(),
        summary.passed(),
        summary.mismatched(),
        summary.failed_navigations(),
        summary.skipped_menus(),
        summary.duplicates.total()
    );
}

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub start_url: String,
    pub kind: CrawlKind,
    pub config: CrawlConfig,
    pub show_progress_bars: bool,
}

/// Load `start_url` in a fresh primary context and run the requested crawl against it.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlSummary, CrawlError> {
    let CrawlOptions {
        start_url,
        kind,
        config,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Loading {}...", start_url));
        Some(pb)
    } else {
        None
    };

    let mut browser = HttpBrowser::new();
    if let Some(ref user_agent) = config.user_agent {
        browser = browser.with_user_agent(user_agent.clone());
    }
    let browser: Arc<dyn Browser> = Arc::new(browser);
    let timeout = config.navigation_timeout();

    let pb_clone = progress_bar.clone();
    let internal_callback: CrawlProgressCallback = Arc::new(move |msg: String| {
        if let Some(ref pb) = pb_clone {
            pb.set_message(msg.clone());
        }
        if let Some(ref callback) = progress_callback {
            callback(msg);
        }
    });

    let crawler = MenuCrawler::new(browser.clone(), config).with_progress_callback(internal_callback);

    let mut primary = browser.open_context().await?;
    let result = match primary.navigate(&start_url, timeout).await {
        Ok(outcome) => {
            if !outcome.is_success() {
                warn!(
                    "Start page {} answered with status {}",
                    outcome.final_url, outcome.status_code
                );
            }
            debug!(
                "Primary context on {} (status {})",
                outcome.final_url, outcome.status_code
            );
            crawler.run(kind, primary.as_ref()).await
        }
        Err(e) => Err(CrawlError::Scan(e)),
    };
    close_context(primary).await;

    if let Some(ref pb) = progress_bar {
        match &result {
            Ok(summary) => pb.finish_with_message(format!(
                "Crawl complete! {} pages checked",
                summary.total_checks()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
