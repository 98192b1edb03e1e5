//! Flat-file JSON storage
//!
//! One pretty-printed `<slug>.json` per page plus `_`-prefixed run artifacts,
//! all in a single directory.

use super::traits::{LoadedPages, Storage, StorageError, StorageResult};
use crate::record::PageRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix shared by run artifact file names
pub const ARTIFACT_PREFIX: char = '_';

/// A directory of page records and run artifacts
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Opens the directory for writing, creating it if needed
    pub fn create(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Opens an existing directory without creating it
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store reads and writes
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file for `slug`
    pub fn page_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}.json", slug))
    }

    fn record_files(&self) -> StorageResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(StorageError::MissingDirectory(self.root.clone()));
        }

        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::io(&self.root, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.root, e))?;
            let path = entry.path();
            let is_record = path.extension().map(|ext| ext == "json").unwrap_or(false)
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| !name.starts_with(ARTIFACT_PREFIX))
                    .unwrap_or(false);
            if is_record && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Storage for JsonDirStore {
    fn save_page(&self, record: &PageRecord) -> StorageResult<PathBuf> {
        let path = self.page_path(&record.slug);
        let json = record.to_json()?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;
        tracing::debug!("Saved page record: {}", path.display());
        Ok(path)
    }

    fn load_pages(&self) -> StorageResult<LoadedPages> {
        let files = self.record_files()?;
        if files.is_empty() {
            return Err(StorageError::NoRecordFiles(self.root.clone()));
        }

        let mut loaded = LoadedPages::default();
        for path in files {
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| PageRecord::from_json(&text).map_err(|e| e.to_string()));
            match parsed {
                Ok(record) => loaded.records.push(record),
                Err(reason) => {
                    tracing::warn!("Skipping {}: {}", path.display(), reason);
                    loaded.skipped.push((path, reason));
                }
            }
        }

        if loaded.records.is_empty() {
            return Err(StorageError::NoValidRecords(self.root.clone()));
        }
        Ok(loaded)
    }

    fn write_artifact(&self, name: &str, contents: &str) -> StorageResult<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, contents).map_err(|e| StorageError::io(&path, e))?;
        tracing::info!("Wrote {}", path.display());
        Ok(path)
    }
}
