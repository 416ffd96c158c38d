//! CLI error types.

use std::error::Error;

use ssi_config::ConfigError;
use ssi_lookup::LookupError;
use ssi_renderer::{ContentError, RenderError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Lookup(#[from] LookupError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Walk the error source chain and join all messages.
///
/// Transparent wrappers repeat their source's message; repeats are skipped.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        let msg = s.to_string();
        if msgs.last() != Some(&msg) {
            msgs.push(msg);
        }
        source = s.source();
    }
    msgs.join(": ")
}
