//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a single attempt per page
//! - Headless-browser fallback for client-rendered pages
//! - The de-duplicating crawl frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod render;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{
    build_http_client, fetch_page, is_html_content_type, FetchResult, FetchedPage,
    ACCEPT_LANGUAGE_VALUE, ACCEPT_VALUE,
};
pub use frontier::{CrawlTarget, Discovery, Frontier};
pub use render::{renderer_for, BrowserRenderer, NoopRenderer, RenderError, RenderStrategy};

use crate::config::Config;
use crate::GeoError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and create the output directory
/// 2. Fetch robots.txt and collect sitemap URLs
/// 3. Crawl seeds, sitemap URLs and discovered links up to the page budget
/// 4. Write page records and the run artifacts
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `config_hash` - Hash of the config file, recorded in the summary
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed successfully
/// * `Err(GeoError)` - Crawl failed
pub async fn crawl(config: Config, config_hash: Option<String>) -> Result<CrawlOutcome, GeoError> {
    run_crawl(config, config_hash).await
}
