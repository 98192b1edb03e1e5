//! Page record schema
//!
//! A [`PageRecord`] is the central per-page aggregate: fetch metadata,
//! rendering provenance, and every signal the extractor derived. It is
//! written once per successfully fetched URL and read back by the scorer.
//!
//! Records are versioned. Files produced by older crawler generations are
//! accepted by [`PageRecord::from_json`], which resolves every missing field
//! once so that downstream code only ever sees one shape.

mod legacy;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Current page record schema version
pub const SCHEMA_VERSION: u32 = 2;

/// Maximum number of characters of visible text stored per record
pub const MAX_STORED_TEXT_CHARS: usize = 50_000;

/// Errors raised while reading a page record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record has no url field")]
    MissingUrl,

    #[error("Record url is invalid: {0}")]
    InvalidUrl(String),
}

/// How the HTML behind a record was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderProvenance {
    /// Plain HTTP fetch was sufficient
    #[default]
    #[serde(alias = "requests")]
    Direct,

    /// Re-fetched through the headless browser
    #[serde(alias = "selenium")]
    BrowserRendered,

    /// Browser rendering was wanted but unavailable or failed
    #[serde(alias = "requests_only")]
    Degraded,
}

impl RenderProvenance {
    /// Returns the serialized name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::BrowserRendered => "browser-rendered",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for RenderProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heading in the page outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// A link edge with its anchor text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub text: String,
}

/// An image and its alt text (empty when missing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

/// An hreflang alternate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hreflang {
    pub lang: String,
    pub url: String,
}

/// Image alt-text coverage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AltCoverage {
    pub total: usize,
    pub with_alt: usize,
    pub ratio: f64,
}

impl AltCoverage {
    /// Computes coverage over an image list, ratio rounded to 3 decimals
    pub fn from_images(images: &[Image]) -> Self {
        let total = images.len();
        if total == 0 {
            return Self::default();
        }
        let with_alt = images.iter().filter(|i| !i.alt.trim().is_empty()).count();
        let ratio = (with_alt as f64 / total as f64 * 1000.0).round() / 1000.0;
        Self {
            total,
            with_alt,
            ratio,
        }
    }
}

/// Response headers kept for the crawl report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseHeaders {
    #[serde(default, alias = "Last-Modified")]
    pub last_modified: Option<String>,
    #[serde(default, alias = "Cache-Control")]
    pub cache_control: Option<String>,
    #[serde(default, alias = "Content-Type")]
    pub content_type: Option<String>,
    #[serde(default, alias = "X-Frame-Options")]
    pub x_frame_options: Option<String>,
}

/// Fetch-side facts about one page, joined with extracted signals into a record
#[derive(Debug, Clone)]
pub struct FetchMetadata {
    pub url: url::Url,
    pub crawled_at: DateTime<Utc>,
    pub status_code: u16,
    pub response_headers: ResponseHeaders,
    pub x_robots_tag: Option<String>,
    pub rendered_with: RenderProvenance,
}

/// One page's fetch metadata and extracted signals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub schema_version: u32,

    // Identity and fetch metadata
    pub url: String,
    pub slug: String,
    pub crawled_at: Option<DateTime<Utc>>,
    pub status_code: Option<u16>,
    pub response_headers: ResponseHeaders,
    pub x_robots_tag: Option<String>,
    pub rendered_with: RenderProvenance,

    // Document signals
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_robots: Option<String>,
    pub canonical: Option<String>,
    pub og_tags: BTreeMap<String, String>,
    pub hreflang: Vec<Hreflang>,

    // Structural signals
    pub headings: Vec<Heading>,
    pub h1_count: usize,
    pub subheading_count: usize,

    // Relational signals
    pub internal_links: Vec<Link>,
    pub external_links: Vec<Link>,
    pub nav_links: Vec<Link>,

    // Media signals
    pub images: Vec<Image>,
    pub img_alt_coverage: AltCoverage,

    // Content signals
    pub text_content: String,
    pub text_length: usize,
    pub word_count: usize,
    pub faq_count: usize,
    pub answer_first_block: Option<String>,

    // Structured data signals
    pub json_ld: Vec<serde_json::Value>,
    pub schema_microdata: Vec<String>,
    pub rdfa_types: Vec<String>,
    pub has_structured_data: bool,
}

impl PageRecord {
    /// Parses a record from JSON text, resolving older shapes
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Parses a record from a JSON value, resolving older shapes
    pub fn from_value(value: serde_json::Value) -> Result<Self, RecordError> {
        let raw: legacy::RawPageRecord = serde_json::from_value(value)?;
        raw.resolve()
    }

    /// Serializes the record as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns true when an Open Graph title and description are both present
    pub fn has_og_summary(&self) -> bool {
        let present = |key: &str| {
            self.og_tags
                .get(key)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false)
        };
        present("og:title") && present("og:description")
    }

    /// Returns true when the meta robots directive contains `noindex`
    pub fn is_noindex(&self) -> bool {
        self.meta_robots
            .as_deref()
            .map(|r| r.to_lowercase().contains("noindex"))
            .unwrap_or(false)
    }
}

/// Counts headings at level 1
pub fn count_h1(headings: &[Heading]) -> usize {
    headings.iter().filter(|h| h.level == 1).count()
}

/// Counts H2-H4 headings
pub fn count_subheadings(headings: &[Heading]) -> usize {
    headings
        .iter()
        .filter(|h| (2..=4).contains(&h.level))
        .count()
}

/// Approximate word count: whitespace-delimited tokens
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Returns the first `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
