//! Content-to-document rendering.
//!
//! Provides [`Renderer`], which resolves the parent edition and public
//! timestamp for a [`ContentRecord`] and assembles the [`Document`].

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use ssi_lookup::{ContentStore, LookupError, ParentRecord, ParentResolver};

use crate::content::{ContentRecord, UpdateType};
use crate::document::{Document, base_path};

/// Error returned when rendering fails.
///
/// No partial document is produced on any of these.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No edition uses the start page slug.
    #[error("No parent edition found for slug {slug:?}")]
    MissingParent {
        /// Start page slug that was looked up.
        slug: String,
    },
    /// Parent resolver failed.
    #[error("Parent lookup failed for slug {slug:?}")]
    ParentLookup {
        /// Start page slug that was looked up.
        slug: String,
        #[source]
        source: LookupError,
    },
    /// Content store lookup failed (nothing published, transport error).
    #[error("Content store lookup failed for {base_path}")]
    ContentStore {
        /// Base path that was fetched.
        base_path: String,
        #[source]
        source: LookupError,
    },
    /// Published item has no public timestamp.
    #[error("Content store item at {base_path} has no public_updated_at")]
    MissingPublicUpdatedAt {
        /// Base path that was fetched.
        base_path: String,
    },
}

/// Renders service sign-in content into publishing API documents.
///
/// Holds no state between calls; a single renderer can serve concurrent
/// renders.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use ssi_lookup::{MockContentStore, MockParentResolver};
/// use ssi_renderer::Renderer;
///
/// let renderer = Renderer::new(
///     Arc::new(MockParentResolver::new().with_edition("passport", "Passport", "Apply")),
///     Arc::new(MockContentStore::new()),
/// );
/// let document = renderer.render(&content)?;
/// ```
pub struct Renderer {
    parents: Arc<dyn ParentResolver>,
    content_store: Arc<dyn ContentStore>,
}

impl Renderer {
    /// Create a renderer with its lookup collaborators.
    #[must_use]
    pub fn new(parents: Arc<dyn ParentResolver>, content_store: Arc<dyn ContentStore>) -> Self {
        Self {
            parents,
            content_store,
        }
    }

    /// Render a content record.
    ///
    /// The parent edition is resolved once, before anything else is looked
    /// up. Major updates are stamped with the current time; other updates
    /// keep the `public_updated_at` of the item already published at the
    /// base path. Every call gets a new random `content_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the parent can't be resolved or, for
    /// non-major updates, the published timestamp can't be fetched.
    pub fn render(&self, content: &ContentRecord) -> Result<Document, RenderError> {
        let slug = content.start_page_slug.as_str();
        let base_path = base_path(slug);

        let parent = self.resolve_parent(slug)?;
        let public_updated_at = self.public_updated_at(&content.update_type, &base_path)?;

        let document = Document::new(content, parent, public_updated_at, Uuid::new_v4());
        info!(
            base_path = %document.base_path,
            update_type = %document.update_type,
            content_id = %document.content_id,
            "Rendered service sign-in document"
        );
        Ok(document)
    }

    fn resolve_parent(&self, slug: &str) -> Result<ParentRecord, RenderError> {
        self.parents
            .resolve_by_slug(slug)
            .map_err(|source| RenderError::ParentLookup {
                slug: slug.to_owned(),
                source,
            })?
            .ok_or_else(|| RenderError::MissingParent {
                slug: slug.to_owned(),
            })
    }

    fn public_updated_at(
        &self,
        update_type: &UpdateType,
        base_path: &str,
    ) -> Result<String, RenderError> {
        if *update_type == UpdateType::Major {
            return Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false));
        }

        debug!(base_path, %update_type, "Keeping published timestamp");
        let item = self
            .content_store
            .fetch(base_path)
            .map_err(|source| RenderError::ContentStore {
                base_path: base_path.to_owned(),
                source,
            })?;

        item.public_updated_at
            .ok_or_else(|| RenderError::MissingPublicUpdatedAt {
                base_path: base_path.to_owned(),
            })
    }
}
