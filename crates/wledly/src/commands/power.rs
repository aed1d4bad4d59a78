//! Power command handler.

use wledly_core::{DispatchCommand, Plugin, PowerSetting};

use crate::cli::{GlobalOpts, PowerArgs, PowerState};
use crate::error::CliError;

use super::{report, util};

impl From<PowerState> for PowerSetting {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::On => Self::On,
            PowerState::Off => Self::Off,
            PowerState::Toggle => Self::Toggle,
        }
    }
}

pub async fn handle(plugin: &Plugin, args: PowerArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = plugin.registry();
    let targets = util::resolve_targets(registry, &args.targets).await?;

    let command = DispatchCommand::SetPower(args.state.into());
    let outcome = plugin.dispatcher().dispatch(&targets, &command).await?;

    report::finish(registry, &outcome, global).await
}
