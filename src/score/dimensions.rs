//! The five readiness dimensions
//!
//! Each function awards up to five points and records one evidence string per
//! point (two for the first external-link step, which reports the count).

use super::patterns::{AUTHOR_REFERENCE, CITATION, DATE_REFERENCE, FAQ, STATISTIC};
use crate::record::{PageRecord, RenderProvenance};
use serde::Serialize;

/// Points and evidence for one dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DimensionScore {
    pub score: u8,
    pub evidence: Vec<String>,
}

impl DimensionScore {
    fn award(&mut self, evidence: impl Into<String>) {
        self.score += 1;
        self.evidence.push(evidence.into());
    }

    fn award_if(&mut self, condition: bool, evidence: impl Into<String>) {
        if condition {
            self.award(evidence);
        }
    }
}

fn present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Can an answer engine lift a direct answer from the page?
pub fn answerability(page: &PageRecord) -> DimensionScore {
    let mut dim = DimensionScore::default();
    dim.award_if(page.h1_count >= 1, "H1 exists");
    dim.award_if(present(page.title.as_deref()), "title exists");

    let block_chars = page
        .answer_first_block
        .as_deref()
        .map(|b| b.chars().count())
        .unwrap_or(0);
    dim.award_if(
        block_chars >= 100,
        format!("answer block >= 100 chars ({} chars)", block_chars),
    );
    dim.award_if(block_chars >= 200, "answer block >= 200 chars");

    let meta_chars = page
        .meta_description
        .as_deref()
        .map(|m| m.chars().count())
        .unwrap_or(0);
    dim.award_if(meta_chars >= 50, "meta_description >= 50 chars");
    dim
}

/// Does the page back its claims with sources and numbers?
pub fn proof(page: &PageRecord) -> DimensionScore {
    let mut dim = DimensionScore::default();
    let external = page.external_links.len();
    dim.award_if(external >= 1, format!("{} external link(s)", external));
    dim.award_if(external >= 3, ">= 3 external links");
    dim.award_if(external >= 5, ">= 5 external links");

    let text = page.text_content.as_str();
    dim.award_if(STATISTIC.is_match(text), "contains statistics (number+unit)");
    dim.award_if(CITATION.is_match(text), "contains citation keywords");
    dim
}

/// Does the page cover related sub-questions and lead onward?
pub fn fan_out(page: &PageRecord) -> DimensionScore {
    let mut dim = DimensionScore::default();
    let subheadings = page.subheading_count;
    dim.award_if(subheadings >= 2, format!("{} subheading(s)", subheadings));
    dim.award_if(subheadings >= 5, ">= 5 subheadings");

    dim.award_if(
        page.faq_count >= 1 || FAQ.is_match(&page.text_content),
        "FAQ content detected",
    );

    let internal = page.internal_links.len();
    dim.award_if(internal >= 3, format!("{} internal link(s)", internal));
    dim.award_if(internal >= 5, ">= 5 internal links");
    dim
}

/// Does the page expose the metadata crawlers index?
pub fn crawlability(page: &PageRecord) -> DimensionScore {
    let mut dim = DimensionScore::default();
    dim.award_if(present(page.title.as_deref()), "title");
    dim.award_if(present(page.meta_description.as_deref()), "meta_desc");
    dim.award_if(present(page.canonical.as_deref()), "canonical");
    dim.award_if(
        page.has_structured_data || !page.json_ld.is_empty() || !page.schema_microdata.is_empty(),
        "structured_data",
    );
    dim.award_if(page.has_og_summary(), "og:title + og:description");
    dim
}

/// Can a reader tell who stands behind the content and when?
pub fn trust(page: &PageRecord) -> DimensionScore {
    let mut dim = DimensionScore::default();
    let browser_rendered = page.rendered_with == RenderProvenance::BrowserRendered;
    if !browser_rendered {
        dim.award("SSR page");
    } else if page.text_length > 500 {
        dim.award("text > 500 despite CSR");
    }

    let text = page.text_content.as_str();
    dim.award_if(DATE_REFERENCE.is_match(text), "has date reference");
    dim.award_if(AUTHOR_REFERENCE.is_match(text), "has author/editor reference");
    dim.award_if(
        present(page.canonical.as_deref()) && !page.is_noindex(),
        "canonical without noindex",
    );

    let ratio = page.img_alt_coverage.ratio;
    dim.award_if(
        ratio > 0.5,
        format!("img alt ratio {:.0}%", ratio * 100.0),
    );
    dim
}
