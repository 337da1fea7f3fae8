use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cloner_engine::{EngineConfig, FetchSettings, PackageSettings, DEFAULT_TITLE};
use engine_logging::engine_warn;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Settings read from `config.toml`; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_url: String,
    pub output_dir: PathBuf,
    pub document_title: String,
    /// Upper bound on asset downloads in flight while packing an archive.
    pub max_concurrent_fetches: usize,
    /// Per-request timeout for documents, stylesheets and assets.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            output_dir: PathBuf::from("."),
            document_title: DEFAULT_TITLE.to_string(),
            max_concurrent_fetches: PackageSettings::default().max_concurrent_fetches,
            request_timeout_secs: FetchSettings::default().request_timeout.as_secs(),
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub service_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub document_title: Option<String>,
}

impl AppConfig {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(service_url) = overrides.service_url {
            self.service_url = service_url;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(document_title) = overrides.document_title {
            self.document_title = document_title;
        }
    }

    pub fn engine_config(&self) -> Result<EngineConfig> {
        let origin = Url::parse(&self.service_url)
            .with_context(|| format!("invalid service url {:?}", self.service_url))?;
        let mut config = EngineConfig::new(origin, self.output_dir.clone());
        config.document_title = self.document_title.clone();
        config.fetch.request_timeout = Duration::from_secs(self.request_timeout_secs.max(1));
        config.package.max_concurrent_fetches = self.max_concurrent_fetches.max(1);
        Ok(config)
    }
}

/// Config file path: `<config dir>/site-cloner/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("site-cloner").join("config.toml"))
}

/// Load the config named on the command line, or the default file if present.
///
/// An explicit file must exist and parse. The default file falls back to
/// built-in values when missing or unreadable.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        return toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()));
    }

    let Some(path) = config_path() else {
        return Ok(AppConfig::default());
    };
    match fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(err) => {
                engine_warn!(
                    "Failed to parse config at {}, using defaults: {}",
                    path.display(),
                    err
                );
                Ok(AppConfig::default())
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => {
            engine_warn!("Failed to read config at {}: {}", path.display(), err);
            Ok(AppConfig::default())
        }
    }
}
