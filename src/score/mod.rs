//! Readiness scoring module
//!
//! Scores one page record on five 0-5 dimensions for a 0-25 total. Scoring is
//! a pure function of the record: the same record always yields the same
//! scores and evidence.

mod dimensions;
mod geo;
mod patterns;

pub use dimensions::{answerability, crawlability, fan_out, proof, trust, DimensionScore};
pub use geo::{average_geo_score, geo_score, GeoScore, Grade, MAX_GEO_SCORE};

use crate::record::PageRecord;
use serde::Serialize;
use std::fmt;

/// Highest score a single dimension can reach
pub const MAX_DIMENSION_SCORE: u8 = 5;

/// Highest total score
pub const MAX_TOTAL_SCORE: u8 = 25;

/// Totals at or below this are critical
pub const CRITICAL_TOTAL: u8 = 8;

/// The five scored dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Answerability,
    Proof,
    FanOut,
    Crawlability,
    Trust,
}

impl Dimension {
    /// All dimensions in report order
    pub const ALL: [Dimension; 5] = [
        Self::Answerability,
        Self::Proof,
        Self::FanOut,
        Self::Crawlability,
        Self::Trust,
    ];

    /// Key used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answerability => "answerability",
            Self::Proof => "proof",
            Self::FanOut => "fan_out",
            Self::Crawlability => "crawlability",
            Self::Trust => "trust",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessScore {
    pub answerability: DimensionScore,
    pub proof: DimensionScore,
    pub fan_out: DimensionScore,
    pub crawlability: DimensionScore,
    pub trust: DimensionScore,
    pub total: u8,
}

impl ReadinessScore {
    /// The score for one dimension
    pub fn dimension(&self, dimension: Dimension) -> &DimensionScore {
        match dimension {
            Dimension::Answerability => &self.answerability,
            Dimension::Proof => &self.proof,
            Dimension::FanOut => &self.fan_out,
            Dimension::Crawlability => &self.crawlability,
            Dimension::Trust => &self.trust,
        }
    }

    /// Returns true when the total is at or below the critical threshold
    pub fn is_critical(&self) -> bool {
        self.total <= CRITICAL_TOTAL
    }
}

/// Scores a page record on every dimension
pub fn score_page(page: &PageRecord) -> ReadinessScore {
    let answerability = answerability(page);
    let proof = proof(page);
    let fan_out = fan_out(page);
    let crawlability = crawlability(page);
    let trust = trust(page);
    let total = answerability.score + proof.score + fan_out.score + crawlability.score + trust.score;

    ReadinessScore {
        answerability,
        proof,
        fan_out,
        crawlability,
        trust,
        total,
    }
}
