//! State module for tracking crawl outcomes
//!
//! # Components
//!
//! - `PageState`: the final outcome of each page taken off the frontier
//! - `OutcomeCounts`: per-state tallies for the crawl summary

mod page_state;

pub use page_state::PageState;

use serde::Serialize;
use std::collections::BTreeMap;

/// Tally of page outcomes over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutcomeCounts(BTreeMap<PageState, usize>);

impl OutcomeCounts {
    /// Records one page outcome
    pub fn record(&mut self, state: PageState) {
        *self.0.entry(state).or_insert(0) += 1;
    }

    /// Returns how many pages ended in `state`
    pub fn get(&self, state: PageState) -> usize {
        self.0.get(&state).copied().unwrap_or(0)
    }

    /// Total number of pages attempted
    pub fn attempted(&self) -> usize {
        self.0.values().sum()
    }

    /// Number of pages skipped for any reason
    pub fn skipped(&self) -> usize {
        self.0
            .iter()
            .filter(|(state, _)| state.is_skipped())
            .map(|(_, n)| n)
            .sum()
    }
}
