//! 100-point page health score
//!
//! A coarser checklist than the five readiness dimensions: each present
//! on-page element adds fixed points and each missing one adds an issue.

use crate::record::PageRecord;
use serde::Serialize;
use std::fmt;

/// Highest GEO score a page can reach
pub const MAX_GEO_SCORE: u8 = 100;

/// Letter grade for a GEO score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Maps a 0-100 score to its grade
    ///
    /// | Score | Grade |
    /// |-------|-------|
    /// | 80+   | A     |
    /// | 60-79 | B     |
    /// | 40-59 | C     |
    /// | 20-39 | D     |
    /// | <20   | F     |
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::A,
            60..=79 => Self::B,
            40..=59 => Self::C,
            20..=39 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GEO score for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoScore {
    pub url: String,
    pub slug: String,
    pub score: u8,
    pub max_score: u8,
    pub grade: Grade,
    pub issues: Vec<String>,
}

/// Adds `points` when `present`, otherwise records `issue`
fn award(present: bool, points: u8, issue: &str, score: &mut u8, issues: &mut Vec<String>) {
    if present {
        *score += points;
    } else {
        issues.push(issue.to_string());
    }
}

/// Scores a page record out of 100
pub fn geo_score(page: &PageRecord) -> GeoScore {
    let mut score = 0u8;
    let mut issues = Vec::new();

    award(page.title.is_some(), 10, "Missing title", &mut score, &mut issues);
    award(
        page.meta_description.is_some(),
        10,
        "Missing meta description",
        &mut score,
        &mut issues,
    );

    match page.h1_count {
        1 => score += 10,
        0 => issues.push("Missing H1".to_string()),
        n => {
            score += 5;
            issues.push(format!("Multiple H1 ({})", n));
        }
    }

    award(page.has_structured_data, 15, "No structured data", &mut score, &mut issues);
    award(page.canonical.is_some(), 5, "Missing canonical", &mut score, &mut issues);
    award(!page.og_tags.is_empty(), 5, "Missing OG tags", &mut score, &mut issues);
    award(
        page.answer_first_block.is_some(),
        15,
        "No answer-first block after H1",
        &mut score,
        &mut issues,
    );

    match page.word_count {
        500.. => score += 10,
        200..=499 => score += 5,
        wc => issues.push(format!("Low word count ({})", wc)),
    }

    let alt = &page.img_alt_coverage;
    if alt.total == 0 {
        score += 5;
    } else if alt.ratio >= 0.8 {
        score += 10;
    } else if alt.ratio >= 0.5 {
        score += 5;
    } else {
        issues.push(format!("Low image alt coverage ({:.0}%)", alt.ratio * 100.0));
    }

    match page.subheading_count {
        3.. => score += 5,
        1..=2 => score += 3,
        _ => issues.push("Few/no subheadings".to_string()),
    }

    if page.faq_count > 0 {
        score += 5;
    } else {
        issues.push("No FAQ content detected".to_string());
    }

    GeoScore {
        url: page.url.clone(),
        slug: page.slug.clone(),
        score,
        max_score: MAX_GEO_SCORE,
        grade: Grade::from_score(score),
        issues,
    }
}

/// Mean GEO score rounded to one decimal, 0 for no pages
pub fn average_geo_score(scores: &[GeoScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: u32 = scores.iter().map(|s| u32::from(s.score)).sum();
    let mean = f64::from(total) / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}
