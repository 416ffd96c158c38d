//! Configuration management for the service sign-in renderer.
//!
//! Parses `ssi.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `editions.path`
//! - `content_store.url`
//! - `content_store.snapshots_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override editions file path.
    pub editions_path: Option<PathBuf>,
    /// Use the HTTP content store at this URL.
    pub content_store_url: Option<String>,
    /// Use the snapshot directory content store.
    pub snapshots_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ssi.toml";

/// Content store used when none is configured.
pub const DEFAULT_CONTENT_STORE_URL: &str = "https://www.gov.uk";

/// Default content store request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editions configuration (paths are relative strings from TOML).
    editions: EditionsConfigRaw,
    /// Content store configuration as parsed.
    content_store: ContentStoreConfigRaw,

    /// Resolved editions configuration (set after loading).
    #[serde(skip)]
    pub editions_resolved: EditionsConfig,
    /// Resolved content store configuration (set after loading).
    #[serde(skip)]
    pub content_store_resolved: ContentStoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw editions configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EditionsConfigRaw {
    path: Option<String>,
}

/// Resolved editions configuration.
#[derive(Debug, Default)]
pub struct EditionsConfig {
    /// YAML file listing publisher editions.
    pub path: PathBuf,
}

/// Raw content store configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentStoreConfigRaw {
    url: Option<String>,
    snapshots_dir: Option<String>,
    timeout_secs: Option<u64>,
}

/// Where previously published items are read from.
#[derive(Debug, PartialEq, Eq)]
pub enum ContentStoreBackend {
    /// Content store HTTP API.
    Http {
        /// Root URL of the content store.
        url: String,
    },
    /// Directory of JSON snapshots.
    Snapshots {
        /// Snapshot root directory.
        dir: PathBuf,
    },
}

/// Resolved content store configuration.
#[derive(Debug)]
pub struct ContentStoreConfig {
    /// Selected backend.
    pub backend: ContentStoreBackend,
    /// Request timeout in seconds (HTTP backend only).
    pub timeout_secs: u64,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            backend: ContentStoreBackend::Http {
                url: DEFAULT_CONTENT_STORE_URL.to_owned(),
            },
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable could not be read during expansion.
    #[error("Cannot expand ${{{var}}} in {field}: {source}")]
    EnvVar {
        /// Config field path (e.g., "`content_store.url`").
        field: String,
        /// Variable name.
        var: String,
        /// Why the variable could not be read.
        source: std::env::VarError,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `ssi.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// A snapshot directory wins over a URL when both are given.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(path) = &settings.editions_path {
            self.editions_resolved.path.clone_from(path);
        }
        if let Some(url) = &settings.content_store_url {
            self.content_store_resolved.backend = ContentStoreBackend::Http { url: url.clone() };
        }
        if let Some(dir) = &settings.snapshots_dir {
            self.content_store_resolved.backend = ContentStoreBackend::Snapshots { dir: dir.clone() };
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            editions: EditionsConfigRaw::default(),
            content_store: ContentStoreConfigRaw::default(),
            editions_resolved: EditionsConfig {
                path: base.join("editions.yaml"),
            },
            content_store_resolved: ContentStoreConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editions_resolved.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "editions.path cannot be empty".to_owned(),
            ));
        }

        if let ContentStoreBackend::Http { url } = &self.content_store_resolved.backend {
            require_non_empty(url, "content_store.url")?;
            require_http_url(url, "content_store.url")?;
        }

        if self.content_store_resolved.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "content_store.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_field(&mut self.editions.path, "editions.path")?;
        expand::expand_field(&mut self.content_store.url, "content_store.url")?;
        expand::expand_field(
            &mut self.content_store.snapshots_dir,
            "content_store.snapshots_dir",
        )?;
        Ok(())
    }

    /// Resolve relative paths against the config directory and pick the
    /// content store backend.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        self.editions_resolved = EditionsConfig {
            path: config_dir.join(self.editions.path.as_deref().unwrap_or("editions.yaml")),
        };

        let backend = match (&self.content_store.url, &self.content_store.snapshots_dir) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(
                    "content_store.url and content_store.snapshots_dir are mutually exclusive"
                        .to_owned(),
                ));
            }
            (Some(url), None) => ContentStoreBackend::Http { url: url.clone() },
            (None, Some(dir)) => ContentStoreBackend::Snapshots {
                dir: config_dir.join(dir),
            },
            (None, None) => ContentStoreBackend::Http {
                url: DEFAULT_CONTENT_STORE_URL.to_owned(),
            },
        };

        self.content_store_resolved = ContentStoreConfig {
            backend,
            timeout_secs: self.content_store.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.editions_resolved.path,
            PathBuf::from("/test/editions.yaml")
        );
        assert_eq!(
            config.content_store_resolved.backend,
            ContentStoreBackend::Http {
                url: "https://www.gov.uk".to_owned()
            }
        );
        assert_eq!(config.content_store_resolved.timeout_secs, 30);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(
            config.editions_resolved.path,
            PathBuf::from("/project/editions.yaml")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_http_backend() {
        let toml = r#"
[editions]
path = "data/editions.yaml"

[content_store]
url = "http://content-store.dev.gov.uk"
timeout_secs = 5
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(
            config.editions_resolved.path,
            PathBuf::from("/project/data/editions.yaml")
        );
        assert_eq!(
            config.content_store_resolved.backend,
            ContentStoreBackend::Http {
                url: "http://content-store.dev.gov.uk".to_owned()
            }
        );
        assert_eq!(config.content_store_resolved.timeout_secs, 5);
    }

    #[test]
    fn test_resolve_snapshots_backend() {
        let toml = r#"
[content_store]
snapshots_dir = "snapshots"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(
            config.content_store_resolved.backend,
            ContentStoreBackend::Snapshots {
                dir: PathBuf::from("/project/snapshots")
            }
        );
    }

    #[test]
    fn test_url_and_snapshots_are_exclusive() {
        let toml = r#"
[content_store]
url = "https://www.gov.uk"
snapshots_dir = "snapshots"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve(Path::new("/project")).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.content_store_resolved.backend = ContentStoreBackend::Http {
            url: "ftp://content-store".to_owned(),
        };

        let err = config.validate().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: content_store.url must start with http:// or https://"
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.content_store_resolved.timeout_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_field_type_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[content_store]\ntimeout_secs = \"x\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_cli_settings_override() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.apply_cli_settings(&CliSettings {
            editions_path: Some(PathBuf::from("/tmp/editions.yaml")),
            content_store_url: Some("http://localhost:3068".to_owned()),
            snapshots_dir: None,
        });

        assert_eq!(
            config.editions_resolved.path,
            PathBuf::from("/tmp/editions.yaml")
        );
        assert_eq!(
            config.content_store_resolved.backend,
            ContentStoreBackend::Http {
                url: "http://localhost:3068".to_owned()
            }
        );
    }

    #[test]
    fn test_cli_snapshots_dir_wins_over_url() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.apply_cli_settings(&CliSettings {
            editions_path: None,
            content_store_url: Some("http://localhost:3068".to_owned()),
            snapshots_dir: Some(PathBuf::from("/tmp/snapshots")),
        });

        assert_eq!(
            config.content_store_resolved.backend,
            ContentStoreBackend::Snapshots {
                dir: PathBuf::from("/tmp/snapshots")
            }
        );
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/ssi.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssi.toml");
        std::fs::write(
            &path,
            "[editions]\npath = \"editions.yaml\"\n\n[content_store]\nsnapshots_dir = \"published\"\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(config.editions_resolved.path, dir.path().join("editions.yaml"));
        assert_eq!(
            config.content_store_resolved.backend,
            ContentStoreBackend::Snapshots {
                dir: dir.path().join("published")
            }
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_from_file_expands_env() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("SSI_TEST_LOAD_URL", "https://content-store.example");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssi.toml");
        std::fs::write(&path, "[content_store]\nurl = \"${SSI_TEST_LOAD_URL}\"\n").unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(
            config.content_store_resolved.backend,
            ContentStoreBackend::Http {
                url: "https://content-store.example".to_owned()
            }
        );
        unsafe {
            std::env::remove_var("SSI_TEST_LOAD_URL");
        }
    }
}
