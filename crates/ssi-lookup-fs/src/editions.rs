//! Parent resolution from a YAML editions export.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use ssi_lookup::{LookupError, LookupErrorKind, ParentRecord, ParentResolver};

use crate::BACKEND;

/// Single entry of an editions export.
///
/// Unknown keys (version numbers, states, timestamps) are ignored.
#[derive(Debug, Deserialize)]
struct EditionEntry {
    slug: String,
    title: String,
    overview: String,
}

/// Parent resolver backed by a YAML list of publisher editions.
///
/// The list is in creation order, oldest first:
///
/// ```yaml
/// - slug: apply-for-a-passport
///   title: Apply for a passport
///   overview: Renew or apply for a passport
/// ```
///
/// When several editions share a slug the last one in the file is returned.
#[derive(Debug)]
pub struct EditionsFile {
    path: Option<PathBuf>,
    editions: Vec<EditionEntry>,
}

impl EditionsFile {
    /// Load editions from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the file can't be read or isn't a valid
    /// editions list.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LookupError::io(e).in_file(path).with_backend(BACKEND))?;

        let mut file = Self::from_yaml(&content).map_err(|e| e.in_file(path))?;
        debug!(
            path = %path.display(),
            count = file.editions.len(),
            "Loaded editions"
        );
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parse editions from YAML content.
    ///
    /// Empty content yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] with [`LookupErrorKind::Parse`] if the YAML is
    /// malformed or an entry lacks `slug`, `title` or `overview`.
    pub fn from_yaml(content: &str) -> Result<Self, LookupError> {
        let trimmed = content.trim();
        let editions = if trimmed.is_empty() {
            Vec::new()
        } else {
            serde_yaml::from_str(trimmed).map_err(|e| {
                LookupError::new(LookupErrorKind::Parse)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?
        };

        Ok(Self {
            path: None,
            editions,
        })
    }

    /// Number of editions loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.editions.len()
    }

    /// Whether no editions were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.editions.is_empty()
    }
}

impl ParentResolver for EditionsFile {
    fn resolve_by_slug(&self, slug: &str) -> Result<Option<ParentRecord>, LookupError> {
        let found = self
            .editions
            .iter()
            .rev()
            .find(|edition| edition.slug == slug)
            .map(|edition| ParentRecord {
                title: edition.title.clone(),
                overview: edition.overview.clone(),
            });

        debug!(
            slug,
            found = found.is_some(),
            source = ?self.path,
            "Resolved parent edition"
        );
        Ok(found)
    }
}
