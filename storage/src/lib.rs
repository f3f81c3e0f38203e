// perlin-storage holds the state document schema & a file-backed store

pub mod models;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::PerlinStateDoc;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed state document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored table is unusable: {0}")]
    Table(#[from] perlin_core::PermutationError),
    #[error("stored table has {0} bytes, expected 256")]
    TableLength(usize),
    #[error("document name {0:?} is not a plain file name")]
    InvalidName(String),
}

/// Directory-backed store of [`PerlinStateDoc`]s, one JSON file per
/// document, keyed by document name.
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn init(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    // Document names become file names, so anything that could traverse
    // out of the store directory is rejected up front.
    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Insert a state document, replacing any existing document with the
    /// same name.
    pub fn create(&self, doc: &PerlinStateDoc) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(self.path_for(&doc.name)?, json)?;
        Ok(())
    }

    /// Read a state document by name.
    pub fn read_by_name(&self, name: &str) -> Result<Option<PerlinStateDoc>, StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Names of every stored document, sorted.
    pub fn list_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete by name (for clean-up). Deleting a missing name is not an
    /// error.
    pub fn delete_by_name(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
