//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the run together:
//! - Resolving robots.txt and sitemap URLs for the target site
//! - Seeding and draining the frontier within the page budget
//! - Fetching, render fallback and signal extraction per page
//! - Writing page records and the run artifacts

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult, FetchedPage};
use crate::crawler::frontier::{CrawlTarget, Discovery, Frontier};
use crate::crawler::render::{renderer_for, RenderStrategy};
use crate::extract::extract_signals;
use crate::output::{format_crawl_report, CrawlSummary, SummaryInputs};
use crate::record::{FetchMetadata, PageRecord, RenderProvenance};
use crate::robots::{fetch_robots, RobotsAnalysis};
use crate::sitemap::{sitemap_sources, SitemapCollector, SitemapListing};
use crate::state::{OutcomeCounts, PageState};
use crate::storage::{
    write_json_artifact, JsonDirStore, Storage, REPORT_ARTIFACT, ROBOTS_ARTIFACT,
    SITEMAP_ARTIFACT, SUMMARY_ARTIFACT,
};
use crate::url::{scope_url, TargetDomain};
use crate::{GeoError, UrlError};
use chrono::Utc;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Everything a finished crawl produced
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Page records in crawl order
    pub records: Vec<PageRecord>,
    pub robots: RobotsAnalysis,
    pub sitemap: SitemapListing,
    pub summary: CrawlSummary,
    /// The store the records and artifacts were written to
    pub store: JsonDirStore,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: Option<String>,
    client: Client,
    target: TargetDomain,
    base_url: Url,
    store: JsonDirStore,
    frontier: Frontier,
    renderer: Box<dyn RenderStrategy>,
    records: Vec<PageRecord>,
    outcomes: OutcomeCounts,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, builds the HTTP client and creates the
    /// output directory. Any failure here is fatal for the run.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration, after CLI overrides
    /// * `config_hash` - Hash of the config file, recorded in the summary
    pub fn new(config: Config, config_hash: Option<String>) -> Result<Self, GeoError> {
        crate::config::validate(&config)?;

        let base_url = Url::parse(&config.site.base_url)?;
        let target = TargetDomain::from_url(&base_url).ok_or(UrlError::MissingDomain)?;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        let store = JsonDirStore::create(&config.output.directory)?;
        let renderer = renderer_for(&config.render, config.user_agent.header_value());

        Ok(Self {
            config,
            config_hash,
            client,
            target,
            base_url,
            store,
            frontier: Frontier::new(),
            renderer,
            records: Vec::new(),
            outcomes: OutcomeCounts::default(),
        })
    }

    /// Replaces the render strategy
    pub fn with_renderer(mut self, renderer: Box<dyn RenderStrategy>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Runs the crawl and writes every artifact
    ///
    /// The browser session is shut down after the loop whether or not the
    /// loop succeeded.
    pub async fn run(mut self) -> Result<CrawlOutcome, GeoError> {
        tracing::info!(
            "Starting crawl of {} (budget: {} pages)",
            self.target,
            self.config.crawler.max_pages
        );

        let bots = self.config.policy.agents.clone();
        let robots = fetch_robots(&self.client, &self.base_url, &bots).await;
        let sitemap = self.collect_sitemap(&robots).await;
        self.seed_frontier(&sitemap);

        let result = self.crawl_loop().await;
        self.renderer.shutdown().await;
        result?;

        let summary = CrawlSummary::build(&SummaryInputs {
            base_domain: self.target.host(),
            config_hash: self.config_hash.as_deref(),
            records: &self.records,
            robots: &robots,
            sitemap: &sitemap,
            outcomes: &self.outcomes,
            bots: &bots,
        });

        write_json_artifact(&self.store, ROBOTS_ARTIFACT, &robots)?;
        write_json_artifact(&self.store, SITEMAP_ARTIFACT, &sitemap)?;
        write_json_artifact(&self.store, SUMMARY_ARTIFACT, &summary)?;
        self.store.write_artifact(
            REPORT_ARTIFACT,
            &format_crawl_report(&self.records, &summary, &robots),
        )?;

        tracing::info!(
            "Crawl completed: {} page(s) saved, {} skipped, {} discovered but not crawled",
            self.records.len(),
            self.outcomes.skipped(),
            summary.discovered_urls_not_crawled.len()
        );

        Ok(CrawlOutcome {
            records: self.records,
            robots,
            sitemap,
            summary,
            store: self.store,
        })
    }

    async fn collect_sitemap(&self, robots: &RobotsAnalysis) -> SitemapListing {
        if !self.config.crawler.follow_sitemap {
            tracing::info!("Sitemap discovery disabled");
            return SitemapListing::empty();
        }

        let sources = sitemap_sources(&self.base_url, &robots.sitemaps);
        let delay = Duration::from_millis(self.config.crawler.sitemap_delay_ms);
        SitemapCollector::new(&self.client, delay)
            .collect(sources)
            .await
    }

    /// Seeds first, then in-scope sitemap URLs
    fn seed_frontier(&mut self, sitemap: &SitemapListing) {
        let seeds = if self.config.site.seeds.is_empty() {
            vec![self.config.site.base_url.clone()]
        } else {
            self.config.site.seeds.clone()
        };

        for seed in &seeds {
            match scope_url(seed, &self.target) {
                Ok(url) => {
                    self.frontier.push(url, Discovery::Seed);
                }
                Err(e) => tracing::warn!("Skipping seed {}: {}", seed, e),
            }
        }

        let mut added = 0;
        for entry in &sitemap.urls {
            match scope_url(entry, &self.target) {
                Ok(url) => {
                    if self.frontier.push(url, Discovery::Sitemap) {
                        added += 1;
                    }
                }
                Err(e) => tracing::debug!("Skipping sitemap URL {}: {}", entry, e),
            }
        }

        tracing::info!(
            "Frontier seeded with {} seed(s) and {} sitemap URL(s)",
            seeds.len(),
            added
        );
    }

    async fn crawl_loop(&mut self) -> Result<(), GeoError> {
        let max_pages = self.config.crawler.max_pages;
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
        let start_time = Instant::now();
        let mut attempts = 0usize;

        while self.records.len() < max_pages {
            let target = match self.frontier.pop() {
                Some(t) => t,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
            };

            tracing::info!(
                "[{}/{}] {} ({})",
                self.records.len() + 1,
                max_pages,
                target.url,
                target.discovered_via
            );

            let state = self.process_target(&target).await?;
            self.outcomes.record(state);
            attempts += 1;

            if attempts % 10 == 0 {
                tracing::info!(
                    "Progress: {} attempted, {} saved, {} in frontier, {:.1}s elapsed",
                    attempts,
                    self.records.len(),
                    self.frontier.pending(),
                    start_time.elapsed().as_secs_f64()
                );
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        if self.frontier.pending() > 0 {
            tracing::info!(
                "Page budget reached with {} URL(s) still queued",
                self.frontier.pending()
            );
        }
        Ok(())
    }

    /// Fetches, extracts and stores one page
    ///
    /// Per-page failures are mapped to a skip state; only storage failures
    /// propagate.
    async fn process_target(&mut self, target: &CrawlTarget) -> Result<PageState, GeoError> {
        let fetch_result = fetch_page(&self.client, &target.url).await;

        let page = match fetch_result {
            FetchResult::Success(page) => page,
            FetchResult::ContentMismatch { content_type } => {
                tracing::info!("Skipping {}: not HTML ({})", target.url, content_type);
                return Ok(PageState::ContentMismatch);
            }
            FetchResult::HttpError { status_code, state } => {
                tracing::warn!("Skipping {}: HTTP {}", target.url, status_code);
                return Ok(state);
            }
            FetchResult::NetworkError { error, state } => {
                tracing::warn!("Skipping {}: {}", target.url, error);
                return Ok(state);
            }
        };

        let record = self.build_record(target, page).await;
        self.store.save_page(&record)?;
        self.enqueue_links(&record, &target.url);

        tracing::debug!(
            "Saved {} ({} internal links, {})",
            record.slug,
            record.internal_links.len(),
            record.rendered_with
        );
        self.records.push(record);
        Ok(PageState::Processed)
    }

    /// Extracts signals, falling back to the browser for thin pages
    async fn build_record(&mut self, target: &CrawlTarget, page: FetchedPage) -> PageRecord {
        let FetchedPage {
            final_url,
            status_code,
            body,
            response_headers,
            x_robots_tag,
        } = page;

        let mut signals = extract_signals(&body, &final_url, &self.target);
        let mut rendered_with = RenderProvenance::Direct;

        if self.config.render.enabled && signals.needs_render() {
            tracing::info!("{} looks client-rendered, trying browser render", target.url);
            match self.renderer.render(&target.url).await {
                Ok(html) => {
                    signals = extract_signals(&html, &final_url, &self.target);
                    rendered_with = RenderProvenance::BrowserRendered;
                }
                Err(e) => {
                    tracing::warn!("Render failed for {}, keeping direct HTML: {}", target.url, e);
                    rendered_with = RenderProvenance::Degraded;
                }
            }
        }

        signals.into_record(FetchMetadata {
            url: target.url.clone(),
            crawled_at: Utc::now(),
            status_code,
            response_headers,
            x_robots_tag,
            rendered_with,
        })
    }

    /// Queues a page's internal and navigation links
    fn enqueue_links(&mut self, record: &PageRecord, from: &Url) {
        let mut added = 0;
        for link in record.internal_links.iter().chain(&record.nav_links) {
            match scope_url(&link.url, &self.target) {
                Ok(url) => {
                    let discovery = Discovery::Link { from: from.clone() };
                    if self.frontier.push(url, discovery) {
                        added += 1;
                    }
                }
                Err(e) => tracing::debug!("Ignoring link {}: {}", link.url, e),
            }
        }
        if added > 0 {
            tracing::debug!("Queued {} new URL(s) from {}", added, from);
        }
    }
}

/// Runs a complete crawl for `config`
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `config_hash` - Hash of the config file, if loaded from disk
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Records and artifacts were written
/// * `Err(GeoError)` - A setup or storage failure ended the run
///
/// # Example
///
/// ```no_run
/// use geo_readiness::config::load_config_with_hash;
/// use geo_readiness::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("site.toml"))?;
/// let outcome = run_crawl(config, Some(hash)).await?;
/// println!("{} pages", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: Option<String>) -> Result<CrawlOutcome, GeoError> {
    Coordinator::new(config, config_hash)?.run().await
}
