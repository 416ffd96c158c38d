//! Publishing API document for a service sign-in page.

use serde::Serialize;
use uuid::Uuid;

use ssi_lookup::ParentRecord;

use crate::content::{ContentRecord, UpdateType};

/// Schema the document is validated against downstream.
pub const SCHEMA_NAME: &str = "service_sign_in";
/// Frontend application that renders the page.
pub const RENDERING_APP: &str = "government-frontend";
/// Application that owns the content.
pub const PUBLISHING_APP: &str = "publisher";
/// Document type of service sign-in pages.
pub const DOCUMENT_TYPE: &str = "service_sign_in";

/// Base path of the sign-in page under a start page slug.
///
/// The slug is inserted as-is: no escaping, no validation.
#[must_use]
pub fn base_path(slug: &str) -> String {
    format!("/{slug}/sign-in")
}

/// How a route matches incoming paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    /// Matches the path and everything below it.
    Prefix,
}

/// Route registered for the published page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Path the route is registered at.
    pub path: String,
    /// Match type.
    #[serde(rename = "type")]
    pub route_type: RouteType,
}

/// Document sent to the publishing API.
///
/// Field names and order are the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    pub schema_name: &'static str,
    pub rendering_app: &'static str,
    pub publishing_app: &'static str,
    pub document_type: &'static str,
    pub locale: String,
    pub update_type: UpdateType,
    pub change_note: Option<String>,
    pub base_path: String,
    pub routes: Vec<Route>,
    pub title: String,
    pub description: String,
    /// RFC 3339 timestamp.
    pub public_updated_at: String,
    pub content_id: Uuid,
}

impl Document {
    /// Assemble a document from its inputs.
    ///
    /// `base_path` and `routes` are derived from the content's start page
    /// slug; title and description come from the parent edition.
    pub(crate) fn new(
        content: &ContentRecord,
        parent: ParentRecord,
        public_updated_at: String,
        content_id: Uuid,
    ) -> Self {
        let base_path = base_path(&content.start_page_slug);
        let routes = vec![Route {
            path: base_path.clone(),
            route_type: RouteType::Prefix,
        }];

        Self {
            schema_name: SCHEMA_NAME,
            rendering_app: RENDERING_APP,
            publishing_app: PUBLISHING_APP,
            document_type: DOCUMENT_TYPE,
            locale: content.locale.clone(),
            update_type: content.update_type.clone(),
            change_note: content.change_note.clone(),
            base_path,
            routes,
            title: parent.title,
            description: parent.overview,
            public_updated_at,
            content_id,
        }
    }
}
