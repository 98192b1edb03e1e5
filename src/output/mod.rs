//! Output module for generating crawl summaries and reports
//!
//! This module handles:
//! - Aggregating page records into the run-level crawl summary
//! - Rendering the markdown crawl report
//! - Building, printing and rendering the readiness scorecard

mod console;
mod markdown;
mod scorecard;
mod summary;

pub use console::{format_scorecard, print_scorecard};
pub use markdown::{format_crawl_report, format_scorecard_markdown, missing_elements};
pub use scorecard::{
    build_scorecard, DimensionStats, EvidenceTable, PageScore, ScoreTable, Scorecard,
    ScorecardSummary,
};
pub use summary::{CrawlSummary, RenderingSummary, RobotsSection, SummaryInputs};
