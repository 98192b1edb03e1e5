//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::record::PageRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Input directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("No page record files in {0}")]
    NoRecordFiles(PathBuf),

    #[error("No valid page records in {0}")]
    NoValidRecords(PathBuf),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Page records read back from storage
#[derive(Debug, Default)]
pub struct LoadedPages {
    /// Valid records, ordered by file name
    pub records: Vec<PageRecord>,
    /// Files that could not be read as records, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Trait for storage backend implementations
///
/// Page records are keyed by slug; run artifacts by a file name starting with
/// `_`, which keeps them out of [`Storage::load_pages`].
pub trait Storage {
    /// Writes a page record, replacing any earlier record with the same slug
    ///
    /// # Returns
    ///
    /// The location the record was written to
    fn save_page(&self, record: &PageRecord) -> StorageResult<PathBuf>;

    /// Loads every page record
    ///
    /// Unreadable or malformed records are reported in
    /// [`LoadedPages::skipped`]. A missing location, no record files, or no
    /// valid records is an error.
    fn load_pages(&self) -> StorageResult<LoadedPages>;

    /// Writes a run artifact under `name`
    fn write_artifact(&self, name: &str, contents: &str) -> StorageResult<PathBuf>;
}
