//! Client configuration.
//!
//! Settings resolve in layers, each overriding the previous one:
//!
//! 1. Built-in defaults (`http://localhost:8000`, 120s timeout, 3s job poll)
//! 2. `$XDG_CONFIG_HOME/specwiz/config.json`, if present
//! 3. `SPECWIZ_API_URL`, `SPECWIZ_TIMEOUT_SECS` and
//!    `SPECWIZ_POLL_INTERVAL_SECS`
//! 4. Command-line flags, applied by the caller through
//!    [`EngineBuilder`](crate::EngineBuilder)
//!
//! The config file holds any subset of the fields:
//!
//! ```json
//! { "api_url": "https://specs.internal:8443", "timeout_secs": 300 }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    backend::http::DEFAULT_API_URL,
    error::{Result, ResultExt, WizardError},
};

/// Name of the config file inside the XDG config directory.
pub const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "SPECWIZ_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "SPECWIZ_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_SECS: &str = "SPECWIZ_POLL_INTERVAL_SECS";

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the planning API
    pub api_url: String,
    /// Per-request timeout; step runs call the model and can be slow
    pub timeout_secs: u64,
    /// Interval between job status fetches
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 120,
            poll_interval_secs: 3,
        }
    }
}

impl Config {
    /// Loads defaults, the XDG config file, then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::FileSystem` or `WizardError::Serialization` for
    /// an unreadable config file, and `WizardError::Configuration` for an
    /// invalid value from any layer.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Location of an existing config file, if there is one.
    pub fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("specwiz").find_config_file(CONFIG_FILE)
    }

    /// Reads a config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading config from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| WizardError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Applies overrides from environment-style lookups.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url.trim().to_string();
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_secs(ENV_TIMEOUT_SECS, &secs)?;
        }
        if let Some(secs) = get(ENV_POLL_INTERVAL_SECS) {
            self.poll_interval_secs = parse_secs(ENV_POLL_INTERVAL_SECS, &secs)?;
        }
        Ok(())
    }

    /// Checks that the settings can produce a working client.
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(WizardError::Configuration {
                message: format!("api_url must be an http(s) URL, got '{}'", self.api_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(WizardError::Configuration {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .with_context_lazy(|| format!("{key} must be a whole number of seconds"))
}
