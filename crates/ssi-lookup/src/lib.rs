//! Lookup contracts for the service sign-in renderer.
//!
//! The renderer never talks to a database or a web service directly. It asks
//! two collaborators for data:
//!
//! - [`ParentResolver`] finds the publisher edition a sign-in page hangs off
//! - [`ContentStore`] returns the previously published item at a base path
//!
//! Both traits share [`LookupError`] so that backends (files, HTTP, in-memory)
//! report failures with the same semantic kinds and retry guidance.
//!
//! # Example
//!
//! ```ignore
//! use ssi_lookup::{MockParentResolver, ParentResolver};
//!
//! let resolver = MockParentResolver::new()
//!     .with_edition("apply-for-a-passport", "Apply for a passport", "Renew or apply");
//! let parent = resolver.resolve_by_slug("apply-for-a-passport")?;
//! ```

mod lookup;
#[cfg(feature = "mock")]
mod mock;

pub use lookup::{
    ContentStore, ErrorStatus, LookupError, LookupErrorKind, LookupSubject, ParentRecord,
    ParentResolver, PublishedItem,
};
#[cfg(feature = "mock")]
pub use mock::{MockContentStore, MockParentResolver};
