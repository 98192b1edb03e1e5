//! Storage module for persisting crawl data
//!
//! This module handles reading and writing crawl output, including:
//! - One JSON page record per crawled page, keyed by slug
//! - Run artifacts (robots analysis, sitemap listing, summaries, reports)
//! - Loading page records back for scoring

mod json_dir;
mod traits;

pub use json_dir::{JsonDirStore, ARTIFACT_PREFIX};
pub use traits::{LoadedPages, Storage, StorageError, StorageResult};

use serde::Serialize;
use std::path::PathBuf;

/// Robots.txt analysis artifact
pub const ROBOTS_ARTIFACT: &str = "_robots_analysis.json";
/// Sitemap listing artifact
pub const SITEMAP_ARTIFACT: &str = "_sitemap_urls.json";
/// Crawl summary artifact
pub const SUMMARY_ARTIFACT: &str = "_crawl_summary.json";
/// Human-readable crawl report
pub const REPORT_ARTIFACT: &str = "_crawl_report.md";
/// Scorecard JSON artifact
pub const SCORECARD_ARTIFACT: &str = "_geo_scorecard.json";
/// Scorecard markdown artifact
pub const SCORECARD_MARKDOWN_ARTIFACT: &str = "_geo_scorecard.md";

/// Serializes `value` as pretty JSON and writes it as an artifact
pub fn write_json_artifact<S, T>(storage: &S, name: &str, value: &T) -> StorageResult<PathBuf>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    storage.write_artifact(name, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_names_are_prefixed() {
        for name in [
            ROBOTS_ARTIFACT,
            SITEMAP_ARTIFACT,
            SUMMARY_ARTIFACT,
            REPORT_ARTIFACT,
            SCORECARD_ARTIFACT,
            SCORECARD_MARKDOWN_ARTIFACT,
        ] {
            assert!(name.starts_with(ARTIFACT_PREFIX), "{}", name);
        }
    }

    #[test]
    fn test_write_json_artifact_is_pretty_utf8() {
        let tmp = TempDir::new().unwrap();
        let store = JsonDirStore::create(tmp.path()).unwrap();
        let path = write_json_artifact(&store, "_test.json", &serde_json::json!({"제목": "안녕"}))
            .unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"제목\": \"안녕\""));
        assert!(text.contains('\n'));
    }
}
