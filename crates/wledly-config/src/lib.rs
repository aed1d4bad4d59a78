//! Configuration for wledly hosts.
//!
//! TOML config (figment: defaults, file, `WLEDLY_*` env), per-installation
//! overrides, translation to `wledly_core::RuntimeConfig`, and the
//! file-backed [`JsonFileStore`] that persists each installation's
//! controller list.

mod store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wledly_core::{RequestTimeouts, RuntimeConfig, WLED_SERVICE};

pub use store::JsonFileStore;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "WLEDLY_CONFIG";
/// Overrides the data directory holding installation settings.
pub const DATA_DIR_ENV: &str = "WLEDLY_DATA_DIR";

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Installation used when none is named on the command line.
    pub default_installation: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named installations. Each one has its own controller list.
    #[serde(default)]
    pub installations: HashMap<String, Installation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_installation: Some(DEFAULT_INSTALLATION.into()),
            defaults: Defaults::default(),
            installations: HashMap::new(),
        }
    }
}

pub const DEFAULT_INSTALLATION: &str = "default";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Bound for info, state, command and preset requests.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Bound for online checks and the name lookup on add.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_scan_timeout")]
    pub scan_timeout_ms: u64,

    /// mDNS service type to browse.
    #[serde(default = "default_service")]
    pub service: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            request_timeout_ms: default_request_timeout(),
            probe_timeout_ms: default_probe_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            scan_timeout_ms: default_scan_timeout(),
            service: default_service(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_request_timeout() -> u64 {
    1500
}
fn default_probe_timeout() -> u64 {
    500
}
fn default_connect_timeout() -> u64 {
    2000
}
fn default_scan_timeout() -> u64 {
    4000
}
fn default_service() -> String {
    WLED_SERVICE.into()
}

/// Per-installation overrides. Anything unset falls back to `[defaults]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Installation {
    /// Where this installation's controller list lives.
    pub settings_file: Option<PathBuf>,
    pub request_timeout_ms: Option<u64>,
    pub probe_timeout_ms: Option<u64>,
    pub scan_timeout_ms: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "wledly", "wledly")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via `WLEDLY_CONFIG` or platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(&[".config", "wledly", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding per-installation settings files.
pub fn data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "wledly"]),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Installation names become file names, so keep them boring.
pub fn validate_installation_name(name: &str) -> Result<(), ConfigError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: "installation".into(),
            reason: format!("'{name}' may only contain letters, digits, '-' and '_'"),
        })
    }
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is fine.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WLEDLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if anything goes wrong.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

impl Config {
    /// Pick the installation: explicit name, then `default_installation`,
    /// then `"default"`.
    pub fn installation_name(&self, explicit: Option<&str>) -> Result<String, ConfigError> {
        let name = explicit
            .or(self.default_installation.as_deref())
            .unwrap_or(DEFAULT_INSTALLATION)
            .to_owned();
        validate_installation_name(&name)?;
        Ok(name)
    }

    fn installation(&self, name: &str) -> Installation {
        self.installations.get(name).cloned().unwrap_or_default()
    }

    /// Settings file for `name`: the configured path, or
    /// `<data_dir>/installations/<name>.json`.
    pub fn settings_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        validate_installation_name(name)?;
        Ok(self.installation(name).settings_file.unwrap_or_else(|| {
            data_dir()
                .join("installations")
                .join(format!("{name}.json"))
        }))
    }

    /// Translate config for `name` into the core's runtime settings.
    ///
    /// `request_timeout_override` (e.g. a `--timeout-ms` flag) beats
    /// every configured request bound.
    pub fn runtime_config(
        &self,
        name: &str,
        request_timeout_override: Option<u64>,
    ) -> Result<RuntimeConfig, ConfigError> {
        let inst = self.installation(name);
        let d = &self.defaults;

        let request_ms = request_timeout_override
            .or(inst.request_timeout_ms)
            .unwrap_or(d.request_timeout_ms);
        let probe_ms = inst.probe_timeout_ms.unwrap_or(d.probe_timeout_ms);
        let scan_ms = inst.scan_timeout_ms.unwrap_or(d.scan_timeout_ms);

        for (field, value) in [
            ("request_timeout_ms", request_ms),
            ("probe_timeout_ms", probe_ms),
            ("connect_timeout_ms", d.connect_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation {
                    field: field.into(),
                    reason: "must be greater than zero".into(),
                });
            }
        }
        if d.service.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "service".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(RuntimeConfig {
            timeouts: RequestTimeouts::uniform(
                Duration::from_millis(request_ms),
                Duration::from_millis(probe_ms),
            ),
            connect_timeout: Duration::from_millis(d.connect_timeout_ms),
            scan_timeout: Duration::from_millis(scan_ms),
            service: d.service.clone(),
        })
    }
}
