//! Robots.txt handling module
//!
//! This module fetches and parses the target site's robots.txt, summarizes
//! access for a list of named search and AI bots, and exposes the sitemap
//! hints it declares.

mod access;
mod parser;

pub use access::{summarize_bots, AccessStatus, BotAccessSummary};
pub use parser::{AgentBlock, Directive, RobotsPolicy, RobotsRule};

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;

/// Robots.txt analysis for one run
///
/// Written as the `_robots_analysis.json` artifact. A missing or unreachable
/// robots.txt yields an analysis with no rules, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct RobotsAnalysis {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    /// HTTP status, absent when the request itself failed
    pub status: Option<u16>,
    /// Transport or HTTP error description
    pub error: Option<String>,
    pub raw_content: Option<String>,
    pub user_agent_blocks: Vec<AgentBlock>,
    pub sitemaps: Vec<String>,
    pub bot_summary: Vec<BotAccessSummary>,
    #[serde(skip)]
    policy: RobotsPolicy,
}

impl RobotsAnalysis {
    /// Builds an analysis from robots.txt content
    pub fn from_content(url: &Url, status: u16, content: &str, bots: &[String]) -> Self {
        let policy = RobotsPolicy::parse(content);
        Self {
            url: url.to_string(),
            fetched_at: Utc::now(),
            status: Some(status),
            error: None,
            raw_content: Some(content.to_string()),
            user_agent_blocks: policy.agents.clone(),
            sitemaps: policy.sitemaps.clone(),
            bot_summary: summarize_bots(&policy, bots),
            policy,
        }
    }

    /// Builds a rule-less analysis (missing file or failed fetch)
    pub fn without_rules(url: &Url, status: Option<u16>, error: Option<String>, bots: &[String]) -> Self {
        let policy = RobotsPolicy::default();
        Self {
            url: url.to_string(),
            fetched_at: Utc::now(),
            status,
            error,
            raw_content: None,
            user_agent_blocks: Vec::new(),
            sitemaps: Vec::new(),
            bot_summary: summarize_bots(&policy, bots),
            policy,
        }
    }

    /// URLs from `urls` that `bot` may not crawl
    pub fn blocked_pages<'a, I>(&self, bot: &str, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        urls.into_iter()
            .filter(|url| !self.policy.is_allowed(url, bot))
            .map(str::to_string)
            .collect()
    }
}

/// Fetches and analyzes `<base>/robots.txt`
///
/// # Outcome Mapping
///
/// | Condition | Analysis |
/// |-----------|----------|
/// | 2xx | parsed rules |
/// | 404 | status 404, no rules |
/// | other status | status recorded, error set, no rules |
/// | transport error | no status, error set, no rules |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `base_url` - The site's base URL
/// * `bots` - Named bots to summarize
pub async fn fetch_robots(client: &Client, base_url: &Url, bots: &[String]) -> RobotsAnalysis {
    let robots_url = match base_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            return RobotsAnalysis::without_rules(base_url, None, Some(e.to_string()), bots);
        }
    };
    tracing::info!("Fetching robots.txt: {}", robots_url);

    let response = match client.get(robots_url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to fetch robots.txt: {}", e);
            return RobotsAnalysis::without_rules(&robots_url, None, Some(e.to_string()), bots);
        }
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        tracing::info!("robots.txt not found (404), continuing without rules");
        return RobotsAnalysis::without_rules(&robots_url, Some(404), None, bots);
    }
    if !status.is_success() {
        tracing::warn!("robots.txt returned HTTP {}", status.as_u16());
        return RobotsAnalysis::without_rules(
            &robots_url,
            Some(status.as_u16()),
            Some(format!("HTTP {}", status.as_u16())),
            bots,
        );
    }

    match response.text().await {
        Ok(content) => {
            let analysis = RobotsAnalysis::from_content(&robots_url, status.as_u16(), &content, bots);
            tracing::info!(
                "Found {} user-agent block(s), {} sitemap(s)",
                analysis.user_agent_blocks.len(),
                analysis.sitemaps.len()
            );
            analysis
        }
        Err(e) => {
            tracing::warn!("Failed to read robots.txt body: {}", e);
            RobotsAnalysis::without_rules(
                &robots_url,
                Some(status.as_u16()),
                Some(e.to_string()),
                bots,
            )
        }
    }
}
