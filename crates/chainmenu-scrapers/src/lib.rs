//! Per-brand source extractors and the contracts they share.
//!
//! Each brand adapter pulls raw candidate records (name, image, nutrition
//! hints) out of whatever document structure its site serves and emits the
//! uniform [`CandidateRecord`] shape. Extraction is deliberately tolerant:
//! a malformed record or a failed page becomes a harvest issue, never a
//! run abort.

pub mod browser;
pub mod brands;
pub mod tables;
pub mod util;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use chainmenu_core::{CandidateRecord, MatchRules};
use chainmenu_storage::{FetchError, HttpFetcher, PageArchive, Throttle};

pub use browser::{BrowserProvider, BrowserSession, ModalFlow, ModalState};

pub const CRATE_NAME: &str = "chainmenu-scrapers";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("browser session required but unavailable")]
    BrowserUnavailable,
    #[error("browser step failed: {0}")]
    Browser(String),
    #[error("{0}")]
    Parse(String),
}

/// Per-run context handed to every scraper.
#[derive(Debug, Clone)]
pub struct ScrapeContext {
    pub workspace_root: PathBuf,
    pub fetched_at: DateTime<Utc>,
}

impl ScrapeContext {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Text-page fetching capability. Production wraps the reqwest fetcher with
/// the brand's fixed-delay throttle; tests script responses in memory.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, brand_slug: &str, url: &str) -> Result<String, ScrapeError>;
}

/// Production fetcher: fixed inter-request pause, then the retrying HTTP
/// client, then an optional raw-body archive write.
pub struct ThrottledPageFetcher {
    inner: Arc<HttpFetcher>,
    throttle: Throttle,
    archive: Option<PageArchive>,
}

impl ThrottledPageFetcher {
    pub fn new(
        inner: Arc<HttpFetcher>,
        request_delay: Duration,
        archive: Option<PageArchive>,
    ) -> Self {
        Self {
            inner,
            throttle: Throttle::new(request_delay),
            archive,
        }
    }
}

#[async_trait]
impl PageFetcher for ThrottledPageFetcher {
    async fn fetch_text(&self, brand_slug: &str, url: &str) -> Result<String, ScrapeError> {
        self.throttle.pause().await;
        let response = self.inner.fetch_bytes(brand_slug, url).await?;
        if let Some(archive) = &self.archive {
            let ext = if url.contains(".json") || url.contains("/api/") {
                "json"
            } else {
                "html"
            };
            if let Err(err) = archive
                .store_page(Utc::now(), brand_slug, ext, &response.body)
                .await
            {
                tracing::warn!(brand_slug, url, error = %err, "failed to archive page body");
            }
        }
        Ok(response.body_text())
    }
}

/// Everything extracted from one brand site in one run, plus the per-page
/// problems hit along the way.
#[derive(Debug, Default)]
pub struct Harvest {
    pub records: Vec<CandidateRecord>,
    pub issues: Vec<String>,
}

impl Harvest {
    pub fn push_issue(&mut self, issue: impl Into<String>) {
        let issue = issue.into();
        tracing::warn!(issue = %issue, "harvest issue");
        self.issues.push(issue);
    }
}

/// Strategy data for one brand: what to track, how to clean names, and how
/// confident a match must be before it is written.
#[derive(Debug, Clone)]
pub struct BrandProfile {
    pub slug: &'static str,
    pub display_name: &'static str,
    pub base_origin: &'static str,
    pub category: &'static str,
    /// Operator-curated canonical menu names, matched in this order.
    pub targets: Vec<String>,
    pub rules: MatchRules,
    /// Acceptance threshold in [0, 100]; sub-threshold candidates are
    /// reported, never written. Tuned per brand against observed data.
    pub threshold: f64,
    pub request_delay: Duration,
}

#[async_trait]
pub trait BrandScraper: Send + Sync {
    fn slug(&self) -> &'static str {
        self.profile().slug
    }

    fn profile(&self) -> &BrandProfile;

    /// Collect candidate records from the live site. Page-level failures
    /// are recorded as issues on the harvest; the remaining pages are
    /// still processed.
    async fn collect(
        &self,
        fetch: &dyn PageFetcher,
        browser: Option<&dyn BrowserSession>,
        ctx: &ScrapeContext,
    ) -> Harvest;
}

pub fn scraper_for_brand(slug: &str) -> Option<Box<dyn BrandScraper>> {
    match slug {
        "mcdonalds" => Some(Box::new(brands::mcdonalds::McdonaldsScraper::new())),
        "burgerking" => Some(Box::new(brands::burgerking::BurgerKingScraper::new())),
        "lotteria" => Some(Box::new(brands::lotteria::LotteriaScraper::new())),
        "kfc" => Some(Box::new(brands::kfc::KfcScraper::new())),
        "momstouch" => Some(Box::new(brands::momstouch::MomsTouchScraper::new())),
        "nobrand" => Some(Box::new(brands::nobrand::NoBrandScraper::new())),
        "popeyes" => Some(Box::new(brands::popeyes::PopeyesScraper::new())),
        _ => None,
    }
}

pub fn all_brand_slugs() -> &'static [&'static str] {
    &[
        "mcdonalds",
        "burgerking",
        "lotteria",
        "kfc",
        "momstouch",
        "nobrand",
        "popeyes",
    ]
}
