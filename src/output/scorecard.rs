//! Readiness scorecard
//!
//! Scores every page, ranks them worst-first and aggregates per-dimension
//! statistics plus threshold-based issues.

use crate::record::{PageRecord, RenderProvenance};
use crate::score::{score_page, Dimension, ReadinessScore, CRITICAL_TOTAL};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Dimension scores plus total, as serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreTable {
    pub answerability: u8,
    pub proof: u8,
    pub fan_out: u8,
    pub crawlability: u8,
    pub trust: u8,
    pub total: u8,
}

/// Evidence strings per dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceTable {
    pub answerability: Vec<String>,
    pub proof: Vec<String>,
    pub fan_out: Vec<String>,
    pub crawlability: Vec<String>,
    pub trust: Vec<String>,
}

/// One page's row in the scorecard
#[derive(Debug, Clone, Serialize)]
pub struct PageScore {
    pub url: String,
    pub slug: String,
    pub scores: ScoreTable,
    pub details: EvidenceTable,
    pub rendered_with: RenderProvenance,
    pub text_length: usize,
    /// Dense rank, 1 = lowest total = fix first
    pub priority_rank: usize,
}

impl PageScore {
    fn new(page: &PageRecord, score: ReadinessScore) -> Self {
        Self {
            url: page.url.clone(),
            slug: page.slug.clone(),
            scores: ScoreTable {
                answerability: score.answerability.score,
                proof: score.proof.score,
                fan_out: score.fan_out.score,
                crawlability: score.crawlability.score,
                trust: score.trust.score,
                total: score.total,
            },
            details: EvidenceTable {
                answerability: score.answerability.evidence,
                proof: score.proof.evidence,
                fan_out: score.fan_out.evidence,
                crawlability: score.crawlability.evidence,
                trust: score.trust.evidence,
            },
            rendered_with: page.rendered_with,
            text_length: page.text_length,
            priority_rank: 0,
        }
    }

    /// Score for one dimension
    pub fn score(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Answerability => self.scores.answerability,
            Dimension::Proof => self.scores.proof,
            Dimension::FanOut => self.scores.fan_out,
            Dimension::Crawlability => self.scores.crawlability,
            Dimension::Trust => self.scores.trust,
        }
    }

    pub fn is_browser_rendered(&self) -> bool {
        self.rendered_with == RenderProvenance::BrowserRendered
    }

    pub fn is_critical(&self) -> bool {
        self.scores.total <= CRITICAL_TOTAL
    }
}

/// Average, minimum and maximum of one dimension across pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionStats {
    pub avg: f64,
    pub min: u8,
    pub max: u8,
}

/// Batch-level aggregates
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScorecardSummary {
    pub by_dimension: BTreeMap<Dimension, DimensionStats>,
    pub top_issues: Vec<String>,
}

/// The full scorecard, written as `_geo_scorecard.json`
#[derive(Debug, Clone, Serialize)]
pub struct Scorecard {
    pub generated_at: DateTime<Utc>,
    pub total_pages: usize,
    pub average_score: f64,
    /// Pages ordered by ascending total
    pub pages: Vec<PageScore>,
    pub summary: ScorecardSummary,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scores and ranks a batch of page records
pub fn build_scorecard(records: &[PageRecord]) -> Scorecard {
    let mut pages: Vec<PageScore> = records
        .iter()
        .map(|record| PageScore::new(record, score_page(record)))
        .collect();

    // Stable: equal totals keep input order
    pages.sort_by_key(|p| p.scores.total);

    let mut rank = 0;
    let mut previous = None;
    for page in &mut pages {
        if previous != Some(page.scores.total) {
            rank += 1;
            previous = Some(page.scores.total);
        }
        page.priority_rank = rank;
    }

    let average_score = if pages.is_empty() {
        0.0
    } else {
        let sum: usize = pages.iter().map(|p| p.scores.total as usize).sum();
        round1(sum as f64 / pages.len() as f64)
    };

    Scorecard {
        generated_at: Utc::now(),
        total_pages: pages.len(),
        average_score,
        summary: summarize(&pages),
        pages,
    }
}

fn summarize(pages: &[PageScore]) -> ScorecardSummary {
    let n = pages.len();
    if n == 0 {
        return ScorecardSummary::default();
    }

    let by_dimension = Dimension::ALL
        .iter()
        .map(|&dimension| {
            let values: Vec<u8> = pages.iter().map(|p| p.score(dimension)).collect();
            let sum: usize = values.iter().map(|&v| v as usize).sum();
            let stats = DimensionStats {
                avg: round1(sum as f64 / n as f64),
                min: values.iter().copied().min().unwrap_or(0),
                max: values.iter().copied().max().unwrap_or(0),
            };
            (dimension, stats)
        })
        .collect();

    let count = |pred: &dyn Fn(&PageScore) -> bool| pages.iter().filter(|p| pred(p)).count();
    let checks: [(usize, &str); 7] = [
        (
            count(&|p| p.scores.answerability < 3),
            "lack an answer-first block (answerability < 3)",
        ),
        (count(&|p| p.scores.proof < 2), "have weak Proof (score < 2)"),
        (count(&|p| p.scores.fan_out < 2), "have low Fan-out (score < 2)"),
        (
            count(&|p| p.scores.crawlability < 3),
            "have low Crawlability (score < 3)",
        ),
        (count(&PageScore::is_browser_rendered), "are browser-rendered (CSR)"),
        (count(&|p| p.scores.trust < 2), "have low Trust (score < 2)"),
        (count(&PageScore::is_critical), "score <= 8/25 (critical)"),
    ];
    let top_issues = checks
        .iter()
        .filter(|(hits, _)| *hits > 0)
        .map(|(hits, text)| format!("{}/{} pages {}", hits, n, text))
        .collect();

    ScorecardSummary {
        by_dimension,
        top_issues,
    }
}
