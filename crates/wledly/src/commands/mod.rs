//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod controllers;
pub mod info;
pub mod power;
pub mod preset;
pub mod report;
pub mod scan;
pub mod util;

use wledly_core::Plugin;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an installation-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, plugin: &Plugin, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Controllers(args) => controllers::handle(plugin, args, global).await,
        Command::Scan(args) => scan::handle(plugin, args, global).await,
        Command::Power(args) => power::handle(plugin, args, global).await,
        Command::Preset(args) => preset::activate(plugin, args, global).await,
        Command::Presets(args) => preset::list(plugin, args, global).await,
        Command::Info(args) => info::handle(plugin, args, global).await,
        // Config and Completions are handled before an installation is opened
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need an installation".into(),
        )),
    }
}
