//! Loading word lists by identifier.

use crate::error::SourceError;
use crate::parser::parse;
use crate::types::WordPair;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Supplies the ordered pairs of a named list.
pub trait PairSource {
    fn load_pairs(&self, list_id: &str) -> Result<Vec<WordPair>, SourceError>;
}

/// Reads `<root>/<list_id>.md` list files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// File extension of list files.
    pub const EXTENSION: &'static str = "md";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, list_id: &str) -> Option<PathBuf> {
        let valid = !list_id.is_empty()
            && !list_id.contains(&['/', '\\'][..])
            && list_id != "."
            && list_id != "..";
        valid.then(|| self.root.join(format!("{}.{}", list_id, Self::EXTENSION)))
    }
}

impl PairSource for DirectorySource {
    fn load_pairs(&self, list_id: &str) -> Result<Vec<WordPair>, SourceError> {
        let path = self
            .path_for(list_id)
            .ok_or_else(|| SourceError::NotFound(list_id.to_string()))?;

        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(list_id.to_string()),
            _ => SourceError::Io(e),
        })?;

        let pairs = parse(&content)?;
        tracing::debug!(list_id, count = pairs.len(), "loaded word list");
        Ok(pairs)
    }
}
