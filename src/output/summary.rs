//! Crawl summary
//!
//! Run-level aggregates over the page records of one crawl, written as the
//! `_crawl_summary.json` artifact and rendered into the crawl report.

use crate::record::{PageRecord, RenderProvenance};
use crate::robots::{AgentBlock, BotAccessSummary, RobotsAnalysis};
use crate::score::{average_geo_score, geo_score, GeoScore};
use crate::sitemap::SitemapListing;
use crate::state::OutcomeCounts;
use crate::url::canonicalize;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use url::Url;

/// Everything a crawl summary is computed from
pub struct SummaryInputs<'a> {
    pub base_domain: &'a str,
    pub config_hash: Option<&'a str>,
    pub records: &'a [PageRecord],
    pub robots: &'a RobotsAnalysis,
    pub sitemap: &'a SitemapListing,
    pub outcomes: &'a OutcomeCounts,
    /// Named bots checked for blocked pages
    pub bots: &'a [String],
}

/// Robots.txt section of the summary
#[derive(Debug, Clone, Serialize)]
pub struct RobotsSection {
    pub raw: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub parsed_rules: Vec<AgentBlock>,
    pub bot_summary: Vec<BotAccessSummary>,
    pub sitemaps_found: Vec<String>,
    /// Crawled pages each bot may not fetch; bots with none are omitted
    pub blocked_pages: BTreeMap<String, Vec<String>>,
}

/// Pages grouped by how their HTML was obtained
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderingSummary {
    pub direct: Vec<String>,
    pub browser_rendered: Vec<String>,
    pub degraded: Vec<String>,
}

/// Run-level crawl aggregates
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub crawl_timestamp: DateTime<Utc>,
    pub base_domain: String,
    pub config_hash: Option<String>,
    pub page_count: usize,
    pub crawled_urls: Vec<String>,
    pub total_internal_links: usize,
    pub total_external_links: usize,
    pub discovered_urls_not_crawled: Vec<String>,
    /// Navigation link URL to anchor text
    pub navigation_structure: BTreeMap<String, String>,
    pub pages_with_structured_data: Vec<String>,
    pub pages_without_structured_data: Vec<String>,
    pub robots_txt: RobotsSection,
    pub sitemap_urls: Vec<String>,
    pub sitemap_url_count: usize,
    pub sitemap_urls_in_crawl: Vec<String>,
    pub sitemap_urls_not_crawled: Vec<String>,
    /// Pages the render heuristic flagged (rendered or degraded)
    pub pages_needing_render: Vec<String>,
    pub pages_render_failed: Vec<String>,
    pub rendering_summary: RenderingSummary,
    pub outcomes: OutcomeCounts,
    /// 100-point score per page, in crawl order
    pub page_geo_scores: Vec<GeoScore>,
    pub average_geo_score: f64,
}

/// Canonical crawl form of a sitemap `<loc>`, or the raw string if unparseable
fn canonical_loc(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) => canonicalize(&url).to_string(),
        Err(_) => raw.to_string(),
    }
}

impl CrawlSummary {
    /// Computes the summary for one run
    pub fn build(inputs: &SummaryInputs<'_>) -> Self {
        let records = inputs.records;
        let crawled_urls: Vec<String> = records.iter().map(|r| r.url.clone()).collect();
        let crawled: HashSet<&str> = crawled_urls.iter().map(String::as_str).collect();

        let mut discovered = BTreeSet::new();
        let mut navigation_structure = BTreeMap::new();
        for record in records {
            for link in &record.internal_links {
                discovered.insert(link.url.clone());
            }
            for link in &record.nav_links {
                discovered.insert(link.url.clone());
                navigation_structure.insert(link.url.clone(), link.text.clone());
            }
        }
        let discovered_urls_not_crawled = discovered
            .into_iter()
            .filter(|url| !crawled.contains(url.as_str()))
            .collect();

        let (with_sd, without_sd): (Vec<&PageRecord>, Vec<&PageRecord>) =
            records.iter().partition(|r| r.has_structured_data);

        let mut rendering_summary = RenderingSummary::default();
        for record in records {
            let bucket = match record.rendered_with {
                RenderProvenance::Direct => &mut rendering_summary.direct,
                RenderProvenance::BrowserRendered => &mut rendering_summary.browser_rendered,
                RenderProvenance::Degraded => &mut rendering_summary.degraded,
            };
            bucket.push(record.url.clone());
        }
        let pages_needing_render = records
            .iter()
            .filter(|r| r.rendered_with != RenderProvenance::Direct)
            .map(|r| r.url.clone())
            .collect();

        let sitemap_urls = inputs.sitemap.urls.clone();
        let (sitemap_urls_in_crawl, sitemap_urls_not_crawled): (Vec<String>, Vec<String>) =
            sitemap_urls
                .iter()
                .cloned()
                .partition(|url| crawled.contains(canonical_loc(url).as_str()));

        let page_geo_scores: Vec<GeoScore> = records.iter().map(geo_score).collect();

        let robots = inputs.robots;
        let blocked_pages = inputs
            .bots
            .iter()
            .filter_map(|bot| {
                let blocked = robots.blocked_pages(bot, crawled_urls.iter().map(String::as_str));
                (!blocked.is_empty()).then(|| (bot.clone(), blocked))
            })
            .collect();

        Self {
            crawl_timestamp: Utc::now(),
            base_domain: inputs.base_domain.to_string(),
            config_hash: inputs.config_hash.map(str::to_string),
            page_count: records.len(),
            total_internal_links: records.iter().map(|r| r.internal_links.len()).sum(),
            total_external_links: records.iter().map(|r| r.external_links.len()).sum(),
            discovered_urls_not_crawled,
            navigation_structure,
            pages_with_structured_data: with_sd.iter().map(|r| r.url.clone()).collect(),
            pages_without_structured_data: without_sd.iter().map(|r| r.url.clone()).collect(),
            robots_txt: RobotsSection {
                raw: robots.raw_content.clone(),
                status: robots.status,
                error: robots.error.clone(),
                parsed_rules: robots.user_agent_blocks.clone(),
                bot_summary: robots.bot_summary.clone(),
                sitemaps_found: robots.sitemaps.clone(),
                blocked_pages,
            },
            sitemap_url_count: sitemap_urls.len(),
            sitemap_urls,
            sitemap_urls_in_crawl,
            sitemap_urls_not_crawled,
            pages_needing_render,
            pages_render_failed: rendering_summary.degraded.clone(),
            rendering_summary,
            outcomes: inputs.outcomes.clone(),
            average_geo_score: average_geo_score(&page_geo_scores),
            page_geo_scores,
            crawled_urls,
        }
    }
}
