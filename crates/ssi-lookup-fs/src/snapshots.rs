//! Content store backed by JSON snapshots on disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use ssi_lookup::{ContentStore, LookupError, LookupErrorKind, PublishedItem};

use crate::BACKEND;

/// Content store reading published items from a snapshot directory.
///
/// A base path maps to a JSON file under the root:
/// `"/apply-for-a-passport/sign-in"` → `<root>/apply-for-a-passport/sign-in.json`.
#[derive(Debug)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Snapshot file for a base path.
    ///
    /// Base paths must be absolute and must not escape the root.
    fn snapshot_path(&self, base_path: &str) -> Result<PathBuf, LookupError> {
        let invalid = || {
            LookupError::new(LookupErrorKind::InvalidPath)
                .for_base_path(base_path)
                .with_backend(BACKEND)
        };

        let relative = base_path.strip_prefix('/').ok_or_else(invalid)?;
        let relative = relative.trim_end_matches('/');
        if relative.is_empty() {
            return Err(invalid());
        }
        if !Path::new(relative)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(invalid());
        }

        Ok(self.root.join(format!("{relative}.json")))
    }
}

impl ContentStore for FsContentStore {
    fn fetch(&self, base_path: &str) -> Result<PublishedItem, LookupError> {
        let path = self.snapshot_path(base_path)?;
        debug!(base_path, file = %path.display(), "Reading content store snapshot");

        let content = fs::read_to_string(&path)
            .map_err(|e| LookupError::io(e).for_base_path(base_path).with_backend(BACKEND))?;

        serde_json::from_str(&content).map_err(|e| {
            LookupError::new(LookupErrorKind::Parse)
                .in_file(&path)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }
}
