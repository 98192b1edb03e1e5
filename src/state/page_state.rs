/// Page outcome definitions for a crawl run
///
/// Every page taken off the frontier ends in exactly one of these states.
use serde::Serialize;
use std::fmt;

/// Final outcome of one page fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    // ===== Success =====
    /// Page was fetched, extracted and written as a record
    Processed,

    // ===== Skips =====
    /// Page Content-Type is not HTML
    ContentMismatch,

    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned another non-success HTTP status
    HttpError,

    /// Page could not be reached (timeout, connection refused, DNS failure)
    Unreachable,

    /// Page fetch or record write failed for other reasons
    Failed,
}

impl PageState {
    /// Returns true if the page produced a record
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if the page was skipped
    pub fn is_skipped(&self) -> bool {
        !self.is_success()
    }

    /// Returns the stable string form used in run artifacts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::ContentMismatch => "content_mismatch",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
        }
    }

    /// Maps a non-success HTTP status to its outcome
    pub fn from_http_status(status: u16) -> Self {
        match status {
            404 | 410 => Self::DeadLink,
            _ => Self::HttpError,
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Processed,
            Self::ContentMismatch,
            Self::DeadLink,
            Self::HttpError,
            Self::Unreachable,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
