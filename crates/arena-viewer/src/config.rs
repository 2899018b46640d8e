//! Viewer configuration.
//!
//! Settings come from an optional YAML file (`arena-config.yaml` by
//! default) with environment variables layered on top:
//!
//! - `ARENA_API_URL` overrides `api_url`
//! - `ARENA_ORIGIN_HOST` overrides `origin.host`
//! - `ARENA_ORIGIN_SECURE` overrides `origin.secure`
//!
//! Every field has a default, so an absent file and an empty environment
//! still produce a usable configuration that follows the local origin.

use std::path::Path;

use serde::Deserialize;

use crate::endpoint::{Endpoint, PageOrigin};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid {name}: {reason}")]
    Env {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewerConfig {
    /// Base address of the arena, e.g. `http://localhost:8000`.
    ///
    /// Unset or blank means "derive from `origin`".
    #[serde(default)]
    pub api_url: Option<String>,

    /// Origin used when `api_url` is unset.
    #[serde(default)]
    pub origin: PageOrigin,

    /// Bot spawned when the operator does not name one.
    #[serde(default = "default_bot")]
    pub default_bot: String,
}

fn default_bot() -> String {
    String::from("random_bot")
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            origin: PageOrigin::default(),
            default_bot: default_bot(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a YAML file, then apply the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML and
    /// [`ConfigError::Env`] if an override does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Defaults plus the process environment, for runs without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Overlay values found through `lookup` (normally the process
    /// environment).
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("ARENA_API_URL") {
            self.api_url = Some(url);
        }
        if let Some(host) = lookup("ARENA_ORIGIN_HOST") {
            self.origin.host = host;
        }
        if let Some(secure) = lookup("ARENA_ORIGIN_SECURE") {
            self.origin.secure = secure.trim().parse().map_err(|e| ConfigError::Env {
                name: "ARENA_ORIGIN_SECURE",
                reason: format!("{e}"),
            })?;
        }
        Ok(())
    }

    /// The endpoint described by this configuration.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.api_url.as_deref(), self.origin.clone())
    }
}
