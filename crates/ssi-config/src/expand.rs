//! `${VAR}` and `${VAR:-default}` expansion in config values.

use std::env::{self, VarError};

use crate::ConfigError;

/// Variable that could not be read while expanding a value.
struct UnreadableVar {
    name: String,
    source: VarError,
}

/// Expand environment references in an optional config value, in place.
///
/// `field` names the value in errors. Only braced references are expanded,
/// so a bare `$VAR` (legal in a directory name) is kept as written.
pub(crate) fn expand_field(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    let Some(raw) = value.as_deref() else {
        return Ok(());
    };
    if !raw.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(raw, |name| match env::var(name) {
        Ok(val) => Ok(Some(val)),
        Err(source) => Err(UnreadableVar {
            name: name.to_owned(),
            source,
        }),
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        var: e.cause.name,
        source: e.cause.source,
    })?;

    *value = Some(expanded.into_owned());
    Ok(())
}
