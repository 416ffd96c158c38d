//! Service sign-in renderer.
//!
//! Turns a service sign-in [`ContentRecord`] into the [`Document`] payload
//! the publishing API expects. Title and description come from the parent
//! edition found through a [`ParentResolver`](ssi_lookup::ParentResolver);
//! for non-major updates the public timestamp is carried over from the item
//! already published in the [`ContentStore`](ssi_lookup::ContentStore).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ssi_renderer::{ContentRecord, Renderer};
//!
//! let renderer = Renderer::new(Arc::new(editions), Arc::new(content_store));
//! let content = ContentRecord::from_yaml(&std::fs::read_to_string("sign-in.yaml")?)?;
//! let document = renderer.render(&content)?;
//! println!("{}", serde_json::to_string_pretty(&document)?);
//! ```

mod content;
mod document;
mod renderer;

pub use content::{ContentError, ContentRecord, UpdateType};
pub use document::{
    DOCUMENT_TYPE, Document, PUBLISHING_APP, RENDERING_APP, Route, RouteType, SCHEMA_NAME,
    base_path,
};
pub use renderer::{RenderError, Renderer};
