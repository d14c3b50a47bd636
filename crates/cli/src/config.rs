// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file loading
//!
//! Search order: `--config <path>`, `$KB_CONFIG`,
//! `<config_dir>/keybook/config.toml`, then built-in defaults.
//! `$KB_API_TOKEN` overrides the remote backend's token.

use clap::ValueEnum;
use kb_engine::{AllocationMode, DEFAULT_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV: &str = "KB_CONFIG";
pub const TOKEN_ENV: &str = "KB_API_TOKEN";

const REDACTED: &str = "<redacted>";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("remote backend requires backend.base_url")]
    MissingBaseUrl,
    #[error("failed to render config: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeybookConfig {
    pub backend: BackendConfig,
    pub store: StoreConfig,
    pub validator: ValidatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    Memory(MemoryConfig),
    Remote(RemoteConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Memory(MemoryConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Artificial delay before each operation
    #[serde(with = "humantime_serde")]
    pub latency: Duration,
    /// Start with the demo entries
    pub seed_samples: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            seed_samples: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub base_url: String,
    pub database: String,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            database: "keybook".to_string(),
            collection: "entries".to_string(),
            api_token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub allocation: AllocationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_WINDOW,
        }
    }
}

/// Backend selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Memory,
    Remote,
}

impl KeybookConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or defaults when there is no file to read
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn backend_kind(&self) -> BackendKind {
        match self.backend {
            BackendConfig::Memory(_) => BackendKind::Memory,
            BackendConfig::Remote(_) => BackendKind::Remote,
        }
    }

    /// Switch backends, keeping the configured section when it already
    /// matches
    pub fn select_backend(&mut self, kind: BackendKind) {
        if self.backend_kind() == kind {
            return;
        }
        self.backend = match kind {
            BackendKind::Memory => BackendConfig::Memory(MemoryConfig::default()),
            BackendKind::Remote => BackendConfig::Remote(RemoteConfig::default()),
        };
    }

    /// Replace the remote token (no-op for the memory backend)
    pub fn override_token(&mut self, token: Option<String>) {
        if let (BackendConfig::Remote(remote), Some(token)) = (&mut self.backend, token) {
            if !token.is_empty() {
                remote.api_token = Some(token);
            }
        }
    }

    /// Copy with any secret replaced, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let BackendConfig::Remote(remote) = &mut config.backend {
            if remote.api_token.is_some() {
                remote.api_token = Some(REDACTED.to_string());
            }
        }
        config
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Render(e.to_string()))
    }
}

impl RemoteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(())
    }
}

/// Pick the config file to read.
///
/// Explicit paths (flag or environment) must exist; the per-user default is
/// used only when present.
pub fn resolve_path(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    user_default: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = flag.or(env) {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some(path));
    }
    Ok(user_default.filter(|path| path.is_file()))
}

/// `<config_dir>/keybook/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("keybook").join("config.toml"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
