use serde::Deserialize;

/// Named search and AI crawlers whose robots.txt access is summarized
pub const DEFAULT_BOT_AGENTS: &[&str] = &[
    "OAI-SearchBot",
    "GPTBot",
    "ChatGPT-User",
    "Googlebot",
    "Google-Extended",
    "Bingbot",
    "Anthropic-ai",
    "ClaudeBot",
    "PerplexityBot",
    "Bytespider",
    "CCBot",
];

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// The target site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the site; its host defines the crawl's domain scope
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Seed URLs crawled before anything discovered
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of page records produced per run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Delay observed after every page fetch attempt (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Whether sitemap URLs are merged into the frontier
    #[serde(rename = "follow-sitemap")]
    pub follow_sitemap: bool,

    /// Delay between child sitemap fetches (milliseconds)
    #[serde(rename = "sitemap-delay-ms")]
    pub sitemap_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 25,
            request_delay_ms: 1500,
            request_timeout_secs: 15,
            follow_sitemap: true,
            sitemap_delay_ms: 500,
        }
    }
}

/// Headless-browser render fallback configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether pages that look client-rendered are re-fetched in a browser
    pub enabled: bool,

    /// Page load timeout inside the browser (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Wait after load before the DOM is read (milliseconds)
    #[serde(rename = "settle-ms")]
    pub settle_ms: u64,

    /// Explicit Chrome/Chromium executable; auto-detected when absent
    #[serde(rename = "chrome-path")]
    pub chrome_path: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 20,
            settle_ms: 3000,
            chrome_path: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving page records and run artifacts
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "data/crawled".to_string(),
        }
    }
}

/// Crawl-policy analysis configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Agents whose robots.txt access is summarized
    pub agents: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            agents: DEFAULT_BOT_AGENTS.iter().map(|a| a.to_string()).collect(),
        }
    }
}
