//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use geo_readiness::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site.toml")).unwrap();
//! println!("Crawl budget: {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, PolicyConfig, RenderConfig, SiteConfig,
    UserAgentConfig, DEFAULT_BOT_AGENTS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
