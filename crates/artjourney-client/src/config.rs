//! Client configuration with layered loading.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.artjourney/config.toml`)
//! 3. Environment variables (`ARTJOURNEY_*`)
//!
//! Each layer overrides the previous.
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `ARTJOURNEY_API_URL` | `base_url` | String |
//! | `ARTJOURNEY_TIMEOUT_SECS` | `timeout_secs` | u64 |
//! | `ARTJOURNEY_SNAPSHOT_PATH` | `snapshot_path` | PathBuf |

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default API origin.
const DEFAULT_BASE_URL: &str = "https://api.artjourney.io.vn";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API origin, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds. Applies to every auth call.
    pub timeout_secs: u64,
    /// Where the session snapshot is persisted.
    pub snapshot_path: PathBuf,
}

impl ClientConfig {
    /// Loads configuration with the default layering.
    ///
    /// Shorthand for `ConfigLoader::new().load()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the global config file or an
    /// environment variable cannot be parsed. A *missing* global
    /// config file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            snapshot_path: crate::snapshot::default_snapshot_path(),
        }
    }
}

/// Partial configuration as read from the global TOML file; every
/// field optional so the file may set only what it overrides.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    snapshot_path: Option<PathBuf>,
}

/// Configuration load errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Global config file exists but could not be read.
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Global config file is not valid TOML.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An `ARTJOURNEY_*` variable held an unparseable value.
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: &'static str, reason: String },
}

/// Loader with builder-style overrides, mainly for tests.
///
/// # Example
///
/// ```
/// use artjourney_client::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .skip_global_config()
///     .skip_env_vars()
///     .load()
///     .unwrap();
/// assert_eq!(config.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    global_config_path: Option<PathBuf>,
    skip_global: bool,
    skip_env: bool,
}

impl ConfigLoader {
    /// Creates a loader with the default layering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom global config path instead of
    /// `~/.artjourney/config.toml`.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Skips the global config file layer.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips the environment variable layer. Useful for deterministic
    /// tests.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Loads and merges all layers.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn load(self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::default();

        if !self.skip_global {
            let path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);
            if path.exists() {
                debug!(path = %path.display(), "loading global config");
                let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                let file: FileConfig =
                    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })?;
                merge_file(&mut config, file);
            }
        }

        if !self.skip_env {
            apply_env(&mut config)?;
        }

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.snapshot_path = expand_tilde(&config.snapshot_path);
        Ok(config)
    }
}

fn merge_file(config: &mut ClientConfig, file: FileConfig) {
    if let Some(base_url) = file.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout_secs) = file.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    if let Some(snapshot_path) = file.snapshot_path {
        config.snapshot_path = snapshot_path;
    }
}

fn apply_env(config: &mut ClientConfig) -> Result<(), ConfigError> {
    if let Ok(url) = std::env::var("ARTJOURNEY_API_URL") {
        config.base_url = url;
    }
    if let Ok(raw) = std::env::var("ARTJOURNEY_TIMEOUT_SECS") {
        config.timeout_secs = raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
            var: "ARTJOURNEY_TIMEOUT_SECS",
            reason: format!("expected seconds as integer, got {raw:?}"),
        })?;
    }
    if let Ok(path) = std::env::var("ARTJOURNEY_SNAPSHOT_PATH") {
        config.snapshot_path = PathBuf::from(path);
    }
    Ok(())
}

/// Returns the default global config path (`~/.artjourney/config.toml`).
#[must_use]
pub(crate) fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".artjourney")
        .join("config.toml")
}

/// Expands a leading `~/` to the user's home directory.
pub(crate) fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
