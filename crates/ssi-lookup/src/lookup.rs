//! Lookup traits, records and error types.
//!
//! Provides the [`ParentResolver`] and [`ContentStore`] traits consumed by the
//! renderer, the records they return, and [`LookupError`] for unified error
//! handling across backends.
//!
//! # Base Path Convention
//!
//! Content store lookups are keyed by **base paths** exactly as they appear in
//! a rendered document: a leading `/`, no trailing slash, no escaping
//! (e.g. `"/apply-for-a-passport/sign-in"`). Backends map base paths to their
//! own storage format.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parent edition a sign-in page belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRecord {
    /// Edition title, reused as the sign-in page title.
    pub title: String,
    /// Edition overview, reused as the sign-in page description.
    pub overview: String,
}

/// Previously published item returned by a content store.
///
/// Only `public_updated_at` is read by the renderer. Every other field the
/// store returns is kept in `extra` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishedItem {
    /// Public timestamp of the published item, if the store reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_updated_at: Option<String>,
    /// Remaining fields of the item.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PublishedItem {
    /// Create an item carrying only a `public_updated_at` timestamp.
    #[must_use]
    pub fn with_public_updated_at(timestamp: impl Into<String>) -> Self {
        Self {
            public_updated_at: Some(timestamp.into()),
            extra: Map::new(),
        }
    }
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum LookupErrorKind {
    /// Nothing exists at the requested slug or base path.
    NotFound,
    /// The slug or base path cannot be mapped by this backend.
    InvalidPath,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// Operation timed out.
    Timeout,
    /// Backend returned data that could not be parsed.
    Parse,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance for callers.
///
/// The renderer never retries. Callers that do can use this to decide how.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (not found, invalid path, malformed data).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (rate limited, service unavailable).
    Persistent,
}

impl LookupErrorKind {
    /// Retry guidance a backend reports unless it knows better.
    #[must_use]
    pub fn default_status(self) -> ErrorStatus {
        match self {
            Self::Timeout => ErrorStatus::Temporary,
            Self::Unavailable | Self::RateLimited => ErrorStatus::Persistent,
            Self::NotFound | Self::InvalidPath | Self::Parse | Self::Other => {
                ErrorStatus::Permanent
            }
        }
    }
}

/// What a failed lookup was looking for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupSubject {
    /// Start page slug passed to a [`ParentResolver`].
    Slug(String),
    /// Base path passed to a [`ContentStore`].
    BasePath(String),
    /// Backing file a backend failed to read.
    File(PathBuf),
}

impl fmt::Display for LookupSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slug(slug) => write!(f, "slug {slug:?}"),
            Self::BasePath(base_path) => write!(f, "base path {base_path}"),
            Self::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Failed parent or content store lookup.
///
/// Carries a semantic [`kind`](Self::kind), retry guidance, the subject being
/// looked up and the backend-specific cause.
#[derive(Debug)]
pub struct LookupError {
    /// Semantic error category.
    pub kind: LookupErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Slug, base path or file the lookup was for, if known.
    pub subject: Option<LookupSubject>,
    /// Backend identifier (e.g., "Fs", "Http", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LookupError {
    /// Create a lookup error with the kind's default retry guidance.
    #[must_use]
    pub fn new(kind: LookupErrorKind) -> Self {
        Self {
            kind,
            status: kind.default_status(),
            subject: None,
            backend: None,
            source: None,
        }
    }

    /// No published item exists at `base_path`.
    #[must_use]
    pub fn not_published(base_path: &str) -> Self {
        Self::new(LookupErrorKind::NotFound).for_base_path(base_path)
    }

    /// Classify an I/O failure while reading backend data.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => LookupErrorKind::NotFound,
            std::io::ErrorKind::TimedOut => LookupErrorKind::Timeout,
            std::io::ErrorKind::InvalidData => LookupErrorKind::Parse,
            _ => LookupErrorKind::Other,
        };
        Self::new(kind).with_source(err)
    }

    /// The lookup was for a start page slug.
    #[must_use]
    pub fn for_slug(self, slug: &str) -> Self {
        self.with_subject(LookupSubject::Slug(slug.to_owned()))
    }

    /// The lookup was for a content store base path.
    #[must_use]
    pub fn for_base_path(self, base_path: &str) -> Self {
        self.with_subject(LookupSubject::BasePath(base_path.to_owned()))
    }

    /// The failure happened while reading a backing file.
    #[must_use]
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_subject(LookupSubject::File(path.into()))
    }

    fn with_subject(mut self, subject: LookupSubject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Override the kind's default retry guidance.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "[Http] base path /a/sign-in not found: HTTP 404: ..."
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        match &self.subject {
            Some(subject) => write!(f, "{subject} ")?,
            None => f.write_str("lookup ")?,
        }
        f.write_str(match self.kind {
            LookupErrorKind::NotFound => "not found",
            LookupErrorKind::InvalidPath => "cannot be looked up",
            LookupErrorKind::Unavailable => "unavailable",
            LookupErrorKind::RateLimited => "rate limited",
            LookupErrorKind::Timeout => "timed out",
            LookupErrorKind::Parse => "is malformed",
            LookupErrorKind::Other => "failed",
        })?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Finds the parent edition of a sign-in page by its start page slug.
pub trait ParentResolver: Send + Sync {
    /// Resolve the parent edition for `slug`.
    ///
    /// When several editions share the slug, the most recently created one is
    /// returned.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(parent))` - An edition exists for the slug
    /// - `Ok(None)` - No edition uses this slug
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the backend itself fails (unreadable file,
    /// malformed data).
    fn resolve_by_slug(&self, slug: &str) -> Result<Option<ParentRecord>, LookupError>;
}

/// Read access to previously published items, keyed by base path.
pub trait ContentStore: Send + Sync {
    /// Fetch the published item at `base_path`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] with [`LookupErrorKind::NotFound`] if nothing is
    /// published at the path, or another kind if the lookup itself fails.
    fn fetch(&self, base_path: &str) -> Result<PublishedItem, LookupError>;
}
