//! Configuration module
//!
//! Host, token and production folder come from command-line flags, the
//! `STORK_*` environment variables or the config file, in that order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stork_client::WorkspaceClient;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is set nowhere
    #[error("no {key} configured; run `stork configure` or set {env}")]
    Missing {
        key: &'static str,
        env: &'static str,
    },

    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Contents of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_folder: Option<String>,
}

impl Settings {
    /// Load settings from `path`; a missing file yields empty settings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write settings to `path`, creating its directory
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_error)
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "stork", "stork") {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("~/.stork/config.toml")
    }
}

/// Strip trailing slashes from a host URL
pub fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('/').to_string()
}

/// Workspace folder with a leading slash and no trailing one
pub fn normalize_folder(folder: &str) -> String {
    let folder = folder.trim().trim_end_matches('/');
    if folder.starts_with('/') {
        folder.to_string()
    } else {
        format!("/{}", folder)
    }
}

/// CLI configuration
///
/// Command-line values, already merged with their environment variables by
/// clap, layered over the config file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the config file
    pub path: PathBuf,
    pub settings: Settings,
    pub host: Option<String>,
    pub token: Option<String>,
    pub prod_folder: Option<String>,
}

impl Config {
    pub fn load(
        path: Option<PathBuf>,
        host: Option<String>,
        token: Option<String>,
        prod_folder: Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(default_config_path);
        debug!("loading config from {}", path.display());
        let settings = Settings::load(&path)?;
        Ok(Self {
            path,
            settings,
            host,
            token,
            prod_folder,
        })
    }

    pub fn host(&self) -> Result<String, ConfigError> {
        pick(&self.host, &self.settings.host, "host", "STORK_HOST").map(|h| normalize_host(&h))
    }

    pub fn token(&self) -> Result<String, ConfigError> {
        pick(&self.token, &self.settings.token, "token", "STORK_TOKEN")
    }

    pub fn prod_folder(&self) -> Result<String, ConfigError> {
        pick(
            &self.prod_folder,
            &self.settings.prod_folder,
            "production folder",
            "STORK_FOLDER",
        )
        .map(|f| normalize_folder(&f))
    }

    /// Workspace client for the resolved host and token
    pub fn client(&self) -> Result<WorkspaceClient, ConfigError> {
        Ok(WorkspaceClient::new(self.host()?, self.token()?))
    }
}

fn pick(
    flag: &Option<String>,
    file: &Option<String>,
    key: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    flag.as_ref()
        .or(file.as_ref())
        .filter(|value| !value.trim().is_empty())
        .cloned()
        .ok_or(ConfigError::Missing { key, env })
}
