//! `ssi render` command implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use ssi_config::{CliSettings, Config, ContentStoreBackend};
use ssi_lookup::ContentStore;
use ssi_lookup_fs::{EditionsFile, FsContentStore};
use ssi_lookup_http::HttpContentStore;
use ssi_renderer::{ContentRecord, Document, Renderer};
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Service sign-in content file (YAML or JSON).
    content: PathBuf,

    /// Editions file used to resolve the parent page (overrides config).
    #[arg(long, env = "SSI_EDITIONS")]
    editions: Option<PathBuf>,

    /// Content store URL (overrides config).
    #[arg(long, conflicts_with = "snapshots_dir")]
    content_store_url: Option<String>,

    /// Read published items from a snapshot directory instead of the content store API.
    #[arg(long)]
    snapshots_dir: Option<PathBuf>,

    /// Write the document to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit compact JSON.
    #[arg(long)]
    compact: bool,

    /// Path to configuration file (default: auto-discover ssi.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            editions_path: self.editions.clone(),
            content_store_url: self.content_store_url.clone(),
            snapshots_dir: self.snapshots_dir.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        debug!(
            config = ?config.config_path,
            backend = ?config.content_store_resolved.backend,
            "Loaded configuration"
        );

        if self.verbose {
            output.info(&format!("Content: {}", self.content.display()));
            output.info(&format!(
                "Editions: {}",
                config.editions_resolved.path.display()
            ));
        }

        let document = render_file(&config, &self.content)?;
        let json = if self.compact {
            serde_json::to_string(&document)?
        } else {
            serde_json::to_string_pretty(&document)?
        };

        match &self.output {
            Some(path) => {
                fs::write(path, format!("{json}\n"))?;
                output.success(&format!(
                    "Rendered {} to {}",
                    document.base_path,
                    path.display()
                ));
            }
            None => output.emit(&json)?,
        }
        Ok(())
    }
}

/// Build a renderer from configuration.
fn build_renderer(config: &Config) -> Result<Renderer, CliError> {
    let editions = EditionsFile::open(&config.editions_resolved.path)?;

    let store_config = &config.content_store_resolved;
    let content_store: Arc<dyn ContentStore> = match &store_config.backend {
        ContentStoreBackend::Http { url } => Arc::new(HttpContentStore::new(
            url,
            Duration::from_secs(store_config.timeout_secs),
        )),
        ContentStoreBackend::Snapshots { dir } => Arc::new(FsContentStore::new(dir.clone())),
    };

    Ok(Renderer::new(Arc::new(editions), content_store))
}

/// Read a content file and render it.
fn render_file(config: &Config, content_path: &Path) -> Result<Document, CliError> {
    let content = ContentRecord::from_yaml(&fs::read_to_string(content_path)?)?;
    let renderer = build_renderer(config)?;
    Ok(renderer.render(&content)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const EDITIONS: &str = "\
- slug: apply-for-a-passport
  title: Apply for a passport
  overview: Renew or apply for a passport
";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn snapshot_config(dir: &Path) -> Config {
        let config_path = write(
            dir,
            "ssi.toml",
            "[content_store]\nsnapshots_dir = \"snapshots\"\n",
        );
        Config::load(Some(config_path.as_path()), None).unwrap()
    }

    #[test]
    fn render_file_with_snapshot_store() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "editions.yaml", EDITIONS);
        write(
            dir.path(),
            "snapshots/apply-for-a-passport/sign-in.json",
            r#"{"public_updated_at": "2023-01-01T00:00:00Z"}"#,
        );
        let content = write(
            dir.path(),
            "sign-in.yaml",
            "locale: en\nupdate_type: minor\nstart_page_slug: apply-for-a-passport\n",
        );

        let document = render_file(&snapshot_config(dir.path()), &content).unwrap();

        assert_eq!(document.base_path, "/apply-for-a-passport/sign-in");
        assert_eq!(document.title, "Apply for a passport");
        assert_eq!(document.description, "Renew or apply for a passport");
        assert_eq!(document.public_updated_at, "2023-01-01T00:00:00Z");
    }

    #[test]
    fn render_file_missing_editions_file() {
        let dir = tempfile::tempdir().unwrap();
        let content = write(
            dir.path(),
            "sign-in.yaml",
            "locale: en\nupdate_type: major\nstart_page_slug: apply-for-a-passport\n",
        );

        let err = render_file(&snapshot_config(dir.path()), &content).unwrap_err();

        assert!(matches!(err, CliError::Lookup(_)));
    }

    #[test]
    fn render_file_unknown_slug() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "editions.yaml", EDITIONS);
        let content = write(
            dir.path(),
            "sign-in.yaml",
            "locale: en\nupdate_type: major\nstart_page_slug: register-to-vote\n",
        );

        let err = render_file(&snapshot_config(dir.path()), &content).unwrap_err();

        assert_eq!(
            err.to_string(),
            "No parent edition found for slug \"register-to-vote\""
        );
    }

    #[test]
    fn render_file_invalid_content() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "editions.yaml", EDITIONS);
        let content = write(dir.path(), "sign-in.yaml", "locale: en\n");

        let err = render_file(&snapshot_config(dir.path()), &content).unwrap_err();

        assert!(matches!(err, CliError::Content(_)));
    }
}
