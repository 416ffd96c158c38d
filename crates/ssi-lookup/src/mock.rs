//! Mock lookup implementations for testing.
//!
//! Provides [`MockParentResolver`] and [`MockContentStore`] for unit testing
//! without files or network access.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::lookup::{
    ContentStore, LookupError, LookupErrorKind, ParentRecord, ParentResolver, PublishedItem,
};

/// Mock parent resolver for testing.
///
/// Editions are kept in insertion order, which stands in for creation order:
/// when several editions share a slug, the last one added wins.
///
/// # Example
///
/// ```ignore
/// use ssi_lookup::{MockParentResolver, ParentResolver};
///
/// let resolver = MockParentResolver::new()
///     .with_edition("passport", "Old title", "Old overview")
///     .with_edition("passport", "New title", "New overview");
///
/// let parent = resolver.resolve_by_slug("passport").unwrap().unwrap();
/// assert_eq!(parent.title, "New title");
/// ```
#[derive(Debug, Default)]
pub struct MockParentResolver {
    editions: RwLock<Vec<(String, ParentRecord)>>,
    failure: RwLock<Option<LookupErrorKind>>,
    calls: AtomicUsize,
}

impl MockParentResolver {
    /// Create a resolver with no editions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edition for `slug`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_edition(
        self,
        slug: impl Into<String>,
        title: impl Into<String>,
        overview: impl Into<String>,
    ) -> Self {
        self.editions.write().unwrap().push((
            slug.into(),
            ParentRecord {
                title: title.into(),
                overview: overview.into(),
            },
        ));
        self
    }

    /// Make every lookup fail with the given kind.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn failing_with(self, kind: LookupErrorKind) -> Self {
        *self.failure.write().unwrap() = Some(kind);
        self
    }

    /// Number of `resolve_by_slug` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ParentResolver for MockParentResolver {
    fn resolve_by_slug(&self, slug: &str) -> Result<Option<ParentRecord>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(kind) = *self.failure.read().unwrap() {
            return Err(LookupError::new(kind).for_slug(slug).with_backend("Mock"));
        }

        Ok(self
            .editions
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(s, _)| s == slug)
            .map(|(_, record)| record.clone()))
    }
}

/// Mock content store for testing.
///
/// Stores published items in memory keyed by base path. Paths without an item
/// return a `NotFound` error, like a real store would.
#[derive(Debug, Default)]
pub struct MockContentStore {
    items: RwLock<HashMap<String, PublishedItem>>,
    failures: RwLock<HashMap<String, LookupErrorKind>>,
    calls: AtomicUsize,
}

impl MockContentStore {
    /// Create an empty content store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an item at `base_path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_item(self, base_path: impl Into<String>, item: PublishedItem) -> Self {
        self.items.write().unwrap().insert(base_path.into(), item);
        self
    }

    /// Publish an item at `base_path` with only a `public_updated_at` field.
    #[must_use]
    pub fn with_public_updated_at(
        self,
        base_path: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        self.with_item(base_path, PublishedItem::with_public_updated_at(timestamp))
    }

    /// Make lookups of `base_path` fail with the given kind.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, base_path: impl Into<String>, kind: LookupErrorKind) -> Self {
        self.failures.write().unwrap().insert(base_path.into(), kind);
        self
    }

    /// Number of `fetch` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentStore for MockContentStore {
    fn fetch(&self, base_path: &str) -> Result<PublishedItem, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(kind) = self.failures.read().unwrap().get(base_path) {
            return Err(LookupError::new(*kind)
                .for_base_path(base_path)
                .with_backend("Mock"));
        }

        self.items
            .read()
            .unwrap()
            .get(base_path)
            .cloned()
            .ok_or_else(|| LookupError::not_published(base_path).with_backend("Mock"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mocks_are_send_sync() {
        assert_send_sync::<MockParentResolver>();
        assert_send_sync::<MockContentStore>();
    }

    #[test]
    fn test_resolver_empty() {
        let resolver = MockParentResolver::new();

        assert_eq!(resolver.resolve_by_slug("anything").unwrap(), None);
        assert_eq!(resolver.calls(), 1);
    }

    #[test]
    fn test_resolver_finds_edition() {
        let resolver = MockParentResolver::new()
            .with_edition("apply-for-a-passport", "Apply for a passport", "Renew or apply")
            .with_edition("register-to-vote", "Register to vote", "Register");

        let parent = resolver
            .resolve_by_slug("register-to-vote")
            .unwrap()
            .unwrap();

        assert_eq!(parent.title, "Register to vote");
        assert_eq!(parent.overview, "Register");
    }

    #[test]
    fn test_resolver_last_edition_wins() {
        let resolver = MockParentResolver::new()
            .with_edition("passport", "First", "first")
            .with_edition("other", "Other", "other")
            .with_edition("passport", "Second", "second");

        let parent = resolver.resolve_by_slug("passport").unwrap().unwrap();

        assert_eq!(parent.title, "Second");
    }

    #[test]
    fn test_resolver_failure() {
        let resolver = MockParentResolver::new()
            .with_edition("passport", "Title", "Overview")
            .failing_with(LookupErrorKind::Unavailable);

        let err = resolver.resolve_by_slug("passport").unwrap_err();

        assert_eq!(err.kind, LookupErrorKind::Unavailable);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_store_returns_item() {
        let store = MockContentStore::new()
            .with_public_updated_at("/passport/sign-in", "2023-01-01T00:00:00Z");

        let item = store.fetch("/passport/sign-in").unwrap();

        assert_eq!(
            item.public_updated_at.as_deref(),
            Some("2023-01-01T00:00:00Z")
        );
        assert_eq!(store.calls(), 1);
    }

    #[test]
    fn test_store_missing_item_is_not_found() {
        let store = MockContentStore::new();

        let err = store.fetch("/missing/sign-in").unwrap_err();

        assert_eq!(err.kind, LookupErrorKind::NotFound);
        assert_eq!(err.to_string(), "[Mock] base path /missing/sign-in not found");
    }

    #[test]
    fn test_store_failure_overrides_item() {
        let store = MockContentStore::new()
            .with_public_updated_at("/passport/sign-in", "2023-01-01T00:00:00Z")
            .with_failure("/passport/sign-in", LookupErrorKind::Timeout);

        let err = store.fetch("/passport/sign-in").unwrap_err();

        assert_eq!(err.kind, LookupErrorKind::Timeout);
    }
}
