//! File-backed lookups for the service sign-in renderer.
//!
//! This crate provides two filesystem implementations of the
//! [`ssi_lookup`] traits:
//!
//! - [`EditionsFile`] resolves parent editions from a YAML export of
//!   publisher editions
//! - [`FsContentStore`] serves previously published items from a directory
//!   of JSON snapshots
//!
//! # Example
//!
//! ```ignore
//! use ssi_lookup::{ContentStore, ParentResolver};
//! use ssi_lookup_fs::{EditionsFile, FsContentStore};
//!
//! let editions = EditionsFile::open("editions.yaml")?;
//! let parent = editions.resolve_by_slug("apply-for-a-passport")?;
//!
//! let store = FsContentStore::new("snapshots");
//! let item = store.fetch("/apply-for-a-passport/sign-in")?;
//! ```

mod editions;
mod snapshots;

pub use editions::EditionsFile;
pub use snapshots::FsContentStore;

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";
