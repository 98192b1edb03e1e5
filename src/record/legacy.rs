//! Parse-boundary resolution of page record shapes
//!
//! Every field is optional here. First-generation files carry headings as
//! `{tag, text}`, no enhanced fields, and provenance strings from the old
//! crawler; [`RawPageRecord::resolve`] fills the gaps exactly once.

use super::{
    count_h1, count_subheadings, count_words, truncate_chars, AltCoverage, Heading, Hreflang,
    Image, Link, PageRecord, RecordError, RenderProvenance, ResponseHeaders, SCHEMA_VERSION,
};
use crate::url::url_to_slug;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Characters taken after the first H1 when no H2 bounds the fallback block
const FALLBACK_BLOCK_CHARS: usize = 500;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawPageRecord {
    schema_version: Option<u32>,
    url: Option<String>,
    slug: Option<String>,
    crawled_at: Option<DateTime<Utc>>,
    status_code: Option<u16>,
    response_headers: Option<ResponseHeaders>,
    x_robots_tag: Option<String>,
    rendered_with: Option<RenderProvenance>,
    title: Option<String>,
    meta_description: Option<String>,
    meta_keywords: Option<String>,
    meta_robots: Option<String>,
    canonical: Option<String>,
    og_tags: Option<BTreeMap<String, String>>,
    hreflang: Option<Vec<Hreflang>>,
    headings: Option<Vec<RawHeading>>,
    h1_count: Option<usize>,
    subheading_count: Option<usize>,
    internal_links: Option<Vec<Link>>,
    external_links: Option<Vec<Link>>,
    nav_links: Option<Vec<Link>>,
    images: Option<Vec<Image>>,
    img_alt_coverage: Option<AltCoverage>,
    text_content: Option<String>,
    text_length: Option<usize>,
    word_count: Option<usize>,
    faq_count: Option<usize>,
    answer_first_block: Option<String>,
    json_ld: Option<Vec<serde_json::Value>>,
    schema_microdata: Option<Vec<String>>,
    rdfa_types: Option<Vec<String>>,
    has_structured_data: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHeading {
    level: Option<u8>,
    tag: Option<String>,
    text: Option<String>,
}

impl RawHeading {
    fn resolve(self) -> Option<Heading> {
        let level = self.level.or_else(|| {
            self.tag
                .as_deref()
                .and_then(|t| t.trim().to_ascii_lowercase().strip_prefix('h')?.parse().ok())
        })?;
        let text = self.text?.trim().to_string();
        if !(1..=6).contains(&level) || text.is_empty() {
            return None;
        }
        Some(Heading { level, text })
    }
}

impl RawPageRecord {
    pub(super) fn resolve(self) -> Result<PageRecord, RecordError> {
        let url = self.url.ok_or(RecordError::MissingUrl)?;
        let parsed = Url::parse(&url).map_err(|e| RecordError::InvalidUrl(format!("{}: {}", url, e)))?;

        let headings: Vec<Heading> = self
            .headings
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawHeading::resolve)
            .collect();

        let text_content = self.text_content.unwrap_or_default();
        let images = self.images.unwrap_or_default();
        let json_ld = self.json_ld.unwrap_or_default();
        let schema_microdata = self.schema_microdata.unwrap_or_default();
        let rdfa_types = self.rdfa_types.unwrap_or_default();

        let img_alt_coverage = match self.img_alt_coverage {
            Some(coverage) if coverage.total > 0 => coverage,
            _ => AltCoverage::from_images(&images),
        };

        let answer_first_block = non_blank(self.answer_first_block)
            .or_else(|| non_blank(Some(text_between_h1_and_h2(&headings, &text_content))));

        let has_structured_data = self.has_structured_data.unwrap_or(
            !json_ld.is_empty() || !schema_microdata.is_empty() || !rdfa_types.is_empty(),
        );

        Ok(PageRecord {
            schema_version: self.schema_version.unwrap_or(SCHEMA_VERSION),
            slug: non_blank(self.slug).unwrap_or_else(|| url_to_slug(&parsed)),
            url,
            crawled_at: self.crawled_at,
            status_code: self.status_code,
            response_headers: self.response_headers.unwrap_or_default(),
            x_robots_tag: self.x_robots_tag,
            rendered_with: self.rendered_with.unwrap_or_default(),
            title: non_blank(self.title),
            meta_description: non_blank(self.meta_description),
            meta_keywords: non_blank(self.meta_keywords),
            meta_robots: non_blank(self.meta_robots),
            canonical: non_blank(self.canonical),
            og_tags: self.og_tags.unwrap_or_default(),
            hreflang: self.hreflang.unwrap_or_default(),
            h1_count: self.h1_count.unwrap_or_else(|| count_h1(&headings)),
            subheading_count: self
                .subheading_count
                .unwrap_or_else(|| count_subheadings(&headings)),
            headings,
            internal_links: self.internal_links.unwrap_or_default(),
            external_links: self.external_links.unwrap_or_default(),
            nav_links: self.nav_links.unwrap_or_default(),
            images,
            img_alt_coverage,
            text_length: self
                .text_length
                .unwrap_or_else(|| text_content.chars().count()),
            word_count: self.word_count.unwrap_or_else(|| count_words(&text_content)),
            faq_count: self.faq_count.unwrap_or(0),
            text_content,
            answer_first_block,
            json_ld,
            schema_microdata,
            rdfa_types,
            has_structured_data,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Recovers an answer-first block from flattened text
///
/// Uses the first H1 and first H2 heading texts as anchors inside the page
/// text. Without an H2 anchor, the block is the text following the H1.
fn text_between_h1_and_h2(headings: &[Heading], text: &str) -> String {
    let Some(h1) = headings.iter().find(|h| h.level == 1) else {
        return String::new();
    };
    let Some(h1_pos) = text.find(&h1.text) else {
        return String::new();
    };
    let start = h1_pos + h1.text.len();
    let rest = &text[start..];

    if let Some(h2) = headings.iter().find(|h| h.level == 2) {
        if let Some(h2_pos) = rest.find(&h2.text) {
            return rest[..h2_pos].trim().to_string();
        }
    }

    truncate_chars(rest, FALLBACK_BLOCK_CHARS).trim().to_string()
}
