//! Sitemap discovery module
//!
//! Collects page URLs from `<base>/sitemap.xml` and the sitemaps declared in
//! robots.txt, descending into sitemap indexes. Every failure here is
//! best-effort: a missing or broken sitemap contributes no URLs.

mod parser;

pub use parser::{parse_sitemap, SitemapDocument};

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors for a single sitemap fetch
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("XML parse error: {0}")]
    Xml(String),
}

/// Sitemap URLs found for one run
///
/// Written as the `_sitemap_urls.json` artifact.
#[derive(Debug, Clone, Serialize)]
pub struct SitemapListing {
    pub fetched_at: DateTime<Utc>,
    /// Top-level sitemap locations that were tried, in order
    pub sources: Vec<String>,
    pub total_urls: usize,
    /// Unique page URLs in first-seen order
    pub urls: Vec<String>,
}

impl SitemapListing {
    /// An empty listing (sitemap discovery disabled)
    pub fn empty() -> Self {
        Self {
            fetched_at: Utc::now(),
            sources: Vec::new(),
            total_urls: 0,
            urls: Vec::new(),
        }
    }
}

/// Top-level sitemap locations for a site
///
/// `<base>/sitemap.xml` comes first, then robots.txt sitemaps not already
/// listed.
pub fn sitemap_sources(base_url: &Url, robots_sitemaps: &[String]) -> Vec<String> {
    let mut sources = Vec::new();
    if let Ok(default) = base_url.join("/sitemap.xml") {
        sources.push(default.to_string());
    }
    for sitemap in robots_sitemaps {
        if !sources.contains(sitemap) {
            sources.push(sitemap.clone());
        }
    }
    sources
}

/// Fetches one sitemap document
///
/// Returns `Ok(None)` on 404.
async fn fetch_sitemap(client: &Client, url: &str) -> Result<Option<String>, SitemapError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| SitemapError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(SitemapError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map(Some)
        .map_err(|source| SitemapError::Http {
            url: url.to_string(),
            source,
        })
}

/// Walks sitemaps and sitemap indexes
///
/// Each location is fetched at most once per collector, so an index that
/// lists itself or a cycle of indexes terminates.
pub struct SitemapCollector<'a> {
    client: &'a Client,
    child_delay: Duration,
    visited: HashSet<String>,
}

impl<'a> SitemapCollector<'a> {
    pub fn new(client: &'a Client, child_delay: Duration) -> Self {
        Self {
            client,
            child_delay,
            visited: HashSet::new(),
        }
    }

    /// Collects the page URLs reachable from `sources`
    pub async fn collect(&mut self, sources: Vec<String>) -> SitemapListing {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for source in &sources {
            tracing::info!("Fetching sitemap: {}", source);
            let found = self.walk(source).await;
            tracing::info!("Found {} URL(s) via {}", found.len(), source);
            for url in found {
                if seen.insert(url.clone()) {
                    urls.push(url);
                }
            }
        }

        SitemapListing {
            fetched_at: Utc::now(),
            sources,
            total_urls: urls.len(),
            urls,
        }
    }

    /// Page URLs under one top-level sitemap, descending into indexes
    async fn walk(&mut self, root: &str) -> Vec<String> {
        let mut pages = Vec::new();
        let mut pending: VecDeque<(String, bool)> = VecDeque::new();
        pending.push_back((root.to_string(), false));

        while let Some((location, is_child)) = pending.pop_front() {
            if !self.visited.insert(location.clone()) {
                tracing::debug!("Sitemap already visited: {}", location);
                continue;
            }
            if is_child && !self.child_delay.is_zero() {
                tokio::time::sleep(self.child_delay).await;
            }

            let body = match fetch_sitemap(self.client, &location).await {
                Ok(Some(body)) => body,
                Ok(None) => {
                    tracing::debug!("Sitemap not found: {}", location);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Skipping sitemap {}: {}", location, e);
                    continue;
                }
            };

            match parse_sitemap(&body) {
                Ok(SitemapDocument::Index(children)) => {
                    tracing::debug!("Sitemap index {} lists {} child(ren)", location, children.len());
                    pending.extend(children.into_iter().map(|child| (child, true)));
                }
                Ok(SitemapDocument::UrlSet(urls)) => pages.extend(urls),
                Err(e) => tracing::warn!("Failed to parse sitemap {}: {}", location, e),
            }
        }

        pages
    }
}
