//! CLI configuration -- thin wrapper around `wledly_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--installation, --settings, --timeout-ms).

use std::path::PathBuf;
use std::sync::Arc;

use wledly_core::{Plugin, RuntimeConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use wledly_config::{
    Config, JsonFileStore, config_path, data_dir, load_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Everything a command needs to know about the active installation.
#[derive(Debug)]
pub struct Resolved {
    pub installation: String,
    pub settings_path: PathBuf,
    pub runtime: RuntimeConfig,
}

/// Resolve installation name, settings file and runtime config from
/// config file + flags. Flags win.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let installation = cfg.installation_name(global.installation.as_deref())?;
    let settings_path = match &global.settings {
        Some(path) => path.clone(),
        None => cfg.settings_path(&installation)?,
    };
    let runtime = cfg.runtime_config(&installation, global.timeout_ms)?;

    Ok(Resolved {
        installation,
        settings_path,
        runtime,
    })
}

/// Build the plugin context for the active installation and load its
/// controller list.
pub async fn open_plugin(global: &GlobalOpts) -> Result<Plugin, CliError> {
    let cfg = load_config()?;
    let resolved = resolve(global, &cfg)?;
    tracing::debug!(
        installation = %resolved.installation,
        settings = %resolved.settings_path.display(),
        "opening installation"
    );

    let store = Arc::new(JsonFileStore::new(resolved.settings_path));
    Ok(Plugin::start(resolved.runtime, store).await?)
}
