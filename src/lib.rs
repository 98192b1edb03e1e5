//! geo-readiness: an AI-search readiness auditor for a single website
//!
//! This crate crawls one target site, extracts structural and semantic signals
//! from every page, and scores each page on five 0-5 readiness dimensions
//! (Answerability, Proof, Fan-out, Crawlability, Trust) for a 0-25 total.
//! Results are written as flat JSON and markdown files.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod record;
pub mod robots;
pub mod score;
pub mod sitemap;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for geo-readiness operations
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("URL {url} is outside the target domain {domain}")]
    OutOfScope { url: String, domain: String },
}

/// Result type alias for geo-readiness operations
pub type Result<T> = std::result::Result<T, GeoError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{PageRecord, RenderProvenance};
pub use score::{score_page, ReadinessScore};
pub use state::PageState;
pub use url::{normalize_href, url_to_slug, TargetDomain};
