use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded in the crawl summary so two runs can be compared.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL: &str = r#"
[site]
base-url = "https://example.com"

[user-agent]
crawler-name = "GeoAudit"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.base_url, "https://example.com");
        assert!(config.site.seeds.is_empty());
        assert_eq!(config.crawler.max_pages, 25);
        assert_eq!(config.crawler.request_delay_ms, 1500);
        assert_eq!(config.crawler.request_timeout_secs, 15);
        assert!(config.crawler.follow_sitemap);
        assert!(config.render.enabled);
        assert_eq!(config.render.settle_ms, 3000);
        assert_eq!(config.output.directory, "data/crawled");
        assert_eq!(config.policy.agents.len(), 11);
        assert!(config.policy.agents.iter().any(|a| a == "GPTBot"));
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[site]
base-url = "https://example.com"
seeds = ["https://example.com/", "https://example.com/pricing"]

[crawler]
max-pages = 40
request-delay-ms = 200
request-timeout-secs = 5
follow-sitemap = false
sitemap-delay-ms = 0

[render]
enabled = false
timeout-secs = 10
settle-ms = 1000
chrome-path = "/usr/bin/chromium"

[user-agent]
crawler-name = "GeoAudit"
crawler-version = "2.1"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
directory = "out"

[policy]
agents = ["GPTBot", "ClaudeBot"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.seeds.len(), 2);
        assert_eq!(config.crawler.max_pages, 40);
        assert!(!config.crawler.follow_sitemap);
        assert!(!config.render.enabled);
        assert_eq!(config.render.chrome_path.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.policy.agents, vec!["GPTBot", "ClaudeBot"]);
        assert_eq!(
            config.user_agent.header_value(),
            "GeoAudit/2.1 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = format!("{}\n[crawler]\nmax-pages = 0\n", MINIMAL);
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
