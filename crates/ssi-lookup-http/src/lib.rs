//! Content store HTTP client.
//!
//! Provides [`HttpContentStore`], a sync client for the content store's
//! `GET /api/content/<base_path>` endpoint implementing
//! [`ContentStore`](ssi_lookup::ContentStore).

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, warn};
use ureq::Agent;

use ssi_lookup::{ContentStore, ErrorStatus, LookupError, LookupErrorKind, PublishedItem};

/// Backend identifier for error messages.
const BACKEND: &str = "Http";

/// Characters left as-is in a path segment: A-Z a-z 0-9 - . _ ~
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Non-success status returned by the content store.
#[derive(Debug, thiserror::Error)]
#[error("HTTP {status}: {body}")]
pub struct HttpStatusError {
    /// HTTP status code.
    pub status: u16,
    /// Response body (may contain error details).
    pub body: String,
}

/// Content store client over HTTP.
pub struct HttpContentStore {
    agent: Agent,
    base_url: String,
}

impl HttpContentStore {
    /// Create a client for the content store at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Content store root URL (e.g. `https://www.gov.uk`)
    /// * `timeout` - Global timeout applied to every request
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Content item URL for a base path.
    ///
    /// Base paths are unescaped, so each segment is percent-encoded here.
    fn content_url(&self, base_path: &str) -> String {
        let encoded: Vec<String> = base_path
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string())
            .collect();
        format!("{}/api/content{}", self.base_url, encoded.join("/"))
    }
}

impl ContentStore for HttpContentStore {
    fn fetch(&self, base_path: &str) -> Result<PublishedItem, LookupError> {
        let url = self.content_url(base_path);
        debug!(url = %url, "Fetching content item");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| transport_error(e, base_path))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            warn!(status, base_path, "Content store returned an error");
            return Err(status_error(status, body, base_path));
        }

        body_reader.read_json().map_err(|e| {
            LookupError::new(LookupErrorKind::Parse)
                .for_base_path(base_path)
                .with_backend(BACKEND)
                .with_source(e)
        })
    }
}

/// Map a failed HTTP exchange (no response) to a lookup error.
///
/// A request URL that can't be built fails the same way every time.
fn transport_error(err: ureq::Error, base_path: &str) -> LookupError {
    let (kind, retry) = match &err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => {
            (LookupErrorKind::InvalidPath, ErrorStatus::Permanent)
        }
        ureq::Error::Timeout(_) => (LookupErrorKind::Timeout, ErrorStatus::Temporary),
        _ => (LookupErrorKind::Unavailable, ErrorStatus::Temporary),
    };
    LookupError::new(kind)
        .with_status(retry)
        .for_base_path(base_path)
        .with_backend(BACKEND)
        .with_source(err)
}

/// Map an error status code to a lookup error.
fn status_error(status: u16, body: String, base_path: &str) -> LookupError {
    let (kind, retry) = match status {
        404 | 410 => (LookupErrorKind::NotFound, ErrorStatus::Permanent),
        429 => (LookupErrorKind::RateLimited, ErrorStatus::Persistent),
        500..=599 => (LookupErrorKind::Unavailable, ErrorStatus::Persistent),
        _ => (LookupErrorKind::Other, ErrorStatus::Permanent),
    };
    LookupError::new(kind)
        .with_status(retry)
        .for_base_path(base_path)
        .with_backend(BACKEND)
        .with_source(HttpStatusError { status, body })
}
