//! Content extraction module
//!
//! This module parses page markup and derives every per-page signal the
//! scorer reads: document metadata, the heading outline, structured data,
//! link edges, images, visible text, FAQ markers and the answer-first block.

mod answer;
mod links;
mod meta;
mod structure;
mod text;

pub use answer::{extract_answer_first_block, ANSWER_BLOCK_MAX_CHARS};
pub use links::{extract_images, extract_links, LinkEdges};
pub use meta::{extract_canonical, extract_hreflang, extract_meta, extract_og_tags, extract_title};
pub use structure::{extract_headings, extract_json_ld, extract_microdata, extract_rdfa};
pub use text::{count_faq_signals, element_text, visible_text};

use crate::record::{
    count_h1, count_subheadings, count_words, truncate_chars, AltCoverage, FetchMetadata,
    Heading, Hreflang, Image, Link, PageRecord, MAX_STORED_TEXT_CHARS, SCHEMA_VERSION,
};
use crate::url::{url_to_slug, TargetDomain};
use scraper::Html;
use std::collections::BTreeMap;
use url::Url;

/// Below this many characters of visible text a page is assumed to be
/// client-rendered
pub const MIN_SERVER_TEXT_CHARS: usize = 500;

/// Every signal extracted from one HTML document
#[derive(Debug, Clone, Default)]
pub struct PageSignals {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_robots: Option<String>,
    pub canonical: Option<String>,
    pub og_tags: BTreeMap<String, String>,
    pub hreflang: Vec<Hreflang>,
    pub headings: Vec<Heading>,
    pub internal_links: Vec<Link>,
    pub external_links: Vec<Link>,
    pub nav_links: Vec<Link>,
    pub images: Vec<Image>,
    /// Full visible text, before the storage cap
    pub text: String,
    pub faq_count: usize,
    pub answer_first_block: Option<String>,
    pub json_ld: Vec<serde_json::Value>,
    pub schema_microdata: Vec<String>,
    pub rdfa_types: Vec<String>,
}

/// Parses `html` fetched from `page_url` and extracts all page signals
///
/// # Arguments
///
/// * `html` - Raw markup, either fetched directly or browser-rendered
/// * `page_url` - The canonical URL the markup came from
/// * `target` - The crawl's target domain, for internal/external classification
pub fn extract_signals(html: &str, page_url: &Url, target: &TargetDomain) -> PageSignals {
    let document = Html::parse_document(html);

    let text = visible_text(&document);
    let edges = extract_links(&document, page_url, target);

    PageSignals {
        title: extract_title(&document),
        meta_description: extract_meta(&document, "description"),
        meta_keywords: extract_meta(&document, "keywords"),
        meta_robots: extract_meta(&document, "robots"),
        canonical: extract_canonical(&document),
        og_tags: extract_og_tags(&document),
        hreflang: extract_hreflang(&document),
        headings: extract_headings(&document),
        internal_links: edges.internal,
        external_links: edges.external,
        nav_links: edges.nav,
        images: extract_images(&document, page_url),
        faq_count: count_faq_signals(&text, &document),
        answer_first_block: extract_answer_first_block(&document),
        json_ld: extract_json_ld(&document),
        schema_microdata: extract_microdata(&document),
        rdfa_types: extract_rdfa(&document),
        text,
    }
}

impl PageSignals {
    /// Render-need heuristic
    ///
    /// A direct fetch likely missed client-rendered content when the page has
    /// no title, no H1 with text, or less than [`MIN_SERVER_TEXT_CHARS`] of
    /// visible text.
    pub fn needs_render(&self) -> bool {
        self.title.is_none()
            || count_h1(&self.headings) == 0
            || self.text.chars().count() < MIN_SERVER_TEXT_CHARS
    }

    /// Joins the signals with fetch metadata into a page record
    pub fn into_record(self, fetch: FetchMetadata) -> PageRecord {
        let text_length = self.text.chars().count();
        let word_count = count_words(&self.text);
        let img_alt_coverage = AltCoverage::from_images(&self.images);
        let has_structured_data = !self.json_ld.is_empty()
            || !self.schema_microdata.is_empty()
            || !self.rdfa_types.is_empty();

        PageRecord {
            schema_version: SCHEMA_VERSION,
            slug: url_to_slug(&fetch.url),
            url: fetch.url.to_string(),
            crawled_at: Some(fetch.crawled_at),
            status_code: Some(fetch.status_code),
            response_headers: fetch.response_headers,
            x_robots_tag: fetch.x_robots_tag,
            rendered_with: fetch.rendered_with,
            title: self.title,
            meta_description: self.meta_description,
            meta_keywords: self.meta_keywords,
            meta_robots: self.meta_robots,
            canonical: self.canonical,
            og_tags: self.og_tags,
            hreflang: self.hreflang,
            h1_count: count_h1(&self.headings),
            subheading_count: count_subheadings(&self.headings),
            headings: self.headings,
            internal_links: self.internal_links,
            external_links: self.external_links,
            nav_links: self.nav_links,
            images: self.images,
            img_alt_coverage,
            text_content: truncate_chars(&self.text, MAX_STORED_TEXT_CHARS),
            text_length,
            word_count,
            faq_count: self.faq_count,
            answer_first_block: self.answer_first_block,
            json_ld: self.json_ld,
            schema_microdata: self.schema_microdata,
            rdfa_types: self.rdfa_types,
            has_structured_data,
        }
    }
}
