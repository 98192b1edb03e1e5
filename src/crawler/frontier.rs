//! Crawl frontier
//!
//! An insertion-ordered queue plus the run's seen set. A URL is admitted at
//! most once per run, so nothing is fetched twice.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use url::Url;

/// How a crawl target was discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Seed,
    Sitemap,
    Link { from: Url },
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seed => f.write_str("seed"),
            Self::Sitemap => f.write_str("sitemap"),
            Self::Link { from } => write!(f, "link from {}", from),
        }
    }
}

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    pub discovered_via: Discovery,
    /// Always 1; pages are fetched in a single attempt
    pub attempt: u32,
}

/// FIFO frontier with de-duplication
#[derive(Debug, Default)]
pub struct Frontier {
    seen: HashSet<String>,
    queue: VecDeque<CrawlTarget>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` unless it was already admitted
    ///
    /// # Returns
    ///
    /// `true` if the URL was new
    pub fn push(&mut self, url: Url, discovered_via: Discovery) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(CrawlTarget {
            url,
            discovered_via,
            attempt: 1,
        });
        true
    }

    /// Takes the next target in insertion order
    pub fn pop(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    /// Number of targets still waiting
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_push_deduplicates() {
        let mut frontier = Frontier::new();
        assert!(frontier.push(url("https://x.com/a"), Discovery::Seed));
        assert!(!frontier.push(url("https://x.com/a"), Discovery::Sitemap));
        assert_eq!(frontier.pending(), 1);
    }

    #[test]
    fn test_fifo_order_and_seen_after_pop() {
        let mut frontier = Frontier::new();
        frontier.push(url("https://x.com/seed"), Discovery::Seed);
        frontier.push(url("https://x.com/from-sitemap"), Discovery::Sitemap);
        frontier.push(
            url("https://x.com/linked"),
            Discovery::Link {
                from: url("https://x.com/seed"),
            },
        );

        let first = frontier.pop().unwrap();
        assert_eq!(first.url.as_str(), "https://x.com/seed");
        assert_eq!(first.attempt, 1);
        assert_eq!(frontier.pop().unwrap().discovered_via, Discovery::Sitemap);

        // Popped URLs stay in the seen set
        assert!(!frontier.push(url("https://x.com/seed"), Discovery::Seed));
        assert_eq!(frontier.pending(), 1);
    }

    #[test]
    fn test_discovery_display() {
        let via = Discovery::Link {
            from: url("https://x.com/"),
        };
        assert_eq!(via.to_string(), "link from https://x.com/");
        assert_eq!(Discovery::Seed.to_string(), "seed");
    }
}
