//! Configuration for nicsync.
//!
//! A TOML file plus `NICSYNC_*` environment overrides, layered with
//! figment and translated to `nicsync_core::RuntimeConfig`. Core never
//! sees these types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nicsync_core::{ExecutorConfig, MonitorConfig, ReconcileConfig, RuntimeConfig};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `NICSYNC_MONITOR__INTERVAL_SECS=10`.
pub const ENV_PREFIX: &str = "NICSYNC_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorSection,

    #[serde(default)]
    pub executor: ExecutorSection,

    #[serde(default)]
    pub reconcile: ReconcileSection,

    #[serde(default)]
    pub remote_arp: RemoteArpSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorSection {
    /// Seconds between cycles. Absent, zero or negative means 30.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecutorSection {
    /// PowerShell executable name or path.
    #[serde(default = "default_powershell")]
    pub powershell: String,

    /// Per-command time limit in seconds; 0 disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            powershell: default_powershell(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_powershell() -> String {
    "powershell.exe".into()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconcileSection {
    /// Re-read values after writing them and fail on mismatch.
    #[serde(default)]
    pub verify_after_apply: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteArpSection {
    /// Run the HNS remote-ARP setter when `monitor` starts.
    #[serde(default)]
    pub enabled: bool,
}

impl Config {
    /// Validate and translate into the core's runtime configuration.
    pub fn to_runtime_config(&self) -> Result<RuntimeConfig, ConfigError> {
        let powershell = self.executor.powershell.trim();
        if powershell.is_empty() {
            return Err(ConfigError::Validation {
                field: "executor.powershell".into(),
                reason: "must name an executable".into(),
            });
        }

        let timeout =
            (self.executor.timeout_secs > 0).then(|| Duration::from_secs(self.executor.timeout_secs));

        Ok(RuntimeConfig {
            executor: ExecutorConfig {
                powershell: PathBuf::from(powershell),
                timeout,
            },
            reconcile: ReconcileConfig {
                verify_after_apply: self.reconcile.verify_after_apply,
            },
            monitor: MonitorConfig::from_secs(self.monitor.interval_secs),
            remote_arp_on_start: self.remote_arp.enabled,
        })
    }

    /// Pretty TOML rendering, as written by [`save_config`].
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "nicsync", "nicsync").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    home.join(".config").join("nicsync")
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path` (if it exists), then environment.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config. `path` overrides the platform config location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    Ok(config)
}

/// Load config, falling back to defaults when it cannot be read.
pub fn load_config_or_default(path: Option<&Path>) -> Config {
    load_config(path).unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it, returning the path written.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, cfg.to_toml()?)?;
    Ok(path)
}
