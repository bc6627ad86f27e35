//! Configuration loaded from `config.toml`.
//!
//! Lookup order: `$NOTEVAULT_CONFIG`, then `<config_dir>/notevault/config.toml`.
//! A missing file yields the defaults.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "NOTEVAULT_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vault: VaultConfig,
    pub sync: SyncConfig,
}

/// Where notes live and how their files are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Default vault root when none is given on the command line.
    pub path: Option<PathBuf>,
    /// Note file extension, without the dot.
    pub extension: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: None,
            extension: "md".to_string(),
        }
    }
}

/// Background reconciliation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    pub interval_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 2000,
        }
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VaultError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the config file, if one can be determined.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        dirs::config_dir().map(|d| d.join("notevault").join("config.toml"))
    }

    /// Pick the vault root: command-line override first, then config.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return Ok(path.to_path_buf());
        }
        self.vault.path.clone().ok_or_else(|| {
            VaultError::ConfigError(
                "No vault specified. Use --vault or set [vault] path in config.toml".to_string(),
            )
        })
    }

    fn validate(&self) -> Result<()> {
        let ext = self.vault.extension.trim_start_matches('.');
        if ext.is_empty() || ext.contains(['/', '\\']) {
            return Err(VaultError::ConfigError(format!(
                "Invalid note extension: {:?}",
                self.vault.extension
            )));
        }
        if self.sync.interval_ms == 0 {
            return Err(VaultError::ConfigError(
                "sync.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl VaultConfig {
    /// Extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}
