//! Preset activation and listing handlers.

use std::collections::BTreeMap;

use tabled::Tabled;

use wledly_core::{CoreError, DispatchCommand, Plugin, Preset};

use crate::cli::{ControllerRef, GlobalOpts, PresetArgs, TargetArgs};
use crate::error::CliError;
use crate::output;

use super::{report, util};

// ── Activate ────────────────────────────────────────────────────────

pub async fn activate(
    plugin: &Plugin,
    args: PresetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let registry = plugin.registry();
    let (preset, target_args) = split_values(&args)?;

    let (targets, command) = if let Some(preset) = preset {
        let targets = util::resolve_targets(registry, &target_args).await?;
        (targets, DispatchCommand::ActivatePreset(preset))
    } else {
        let mut map = BTreeMap::new();
        for raw in &args.map {
            let (controller, preset) = util::parse_mapping(raw)?;
            let found = util::resolve_controller(registry, controller).await?;
            map.insert(found.id, preset);
        }
        // Without explicit targets, every mapped controller is a target.
        let targets = if target_args.all || !target_args.controllers.is_empty() {
            util::resolve_targets(registry, &target_args).await?
        } else {
            map.keys().copied().collect()
        };
        (targets, DispatchCommand::ActivatePresets(map))
    };

    let outcome = plugin.dispatcher().dispatch(&targets, &command).await?;
    report::finish(registry, &outcome, global).await
}

/// Separate the preset slot from the targets.
///
/// Without `--map` the first value is the preset; with it, every value
/// names a controller.
fn split_values(args: &PresetArgs) -> Result<(Option<u16>, TargetArgs), CliError> {
    let mut values = args.values.iter();
    let preset = if args.map.is_empty() {
        let raw = values.next().ok_or_else(|| CliError::Validation {
            field: "preset".into(),
            reason: "give a preset ID or at least one --map entry".into(),
        })?;
        let preset = raw.trim().parse::<u16>().map_err(|_| CliError::Validation {
            field: "preset".into(),
            reason: format!("'{raw}' is not a preset number"),
        })?;
        Some(preset)
    } else {
        None
    };

    let controllers: Vec<String> = values.cloned().collect();
    if args.all && !controllers.is_empty() {
        return Err(CliError::Validation {
            field: "all".into(),
            reason: "--all cannot be combined with explicit controllers".into(),
        });
    }
    Ok((
        preset,
        TargetArgs {
            controllers,
            all: args.all,
        },
    ))
}

// ── List ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "ID")]
    id: u16,
    #[tabled(rename = "Name")]
    name: String,
}

pub async fn list(plugin: &Plugin, args: ControllerRef, global: &GlobalOpts) -> Result<(), CliError> {
    let controller = util::resolve_controller(plugin.registry(), &args.controller).await?;
    let client = plugin
        .registry()
        .connector()
        .connect(&controller.address)
        .map_err(CoreError::from)?;

    let presets: Vec<Preset> = client.get_presets().await.map_err(CoreError::from)?;

    let out = output::render_list(
        &global.output,
        &presets,
        |p| PresetRow {
            id: p.id,
            name: p.name.clone(),
        },
        |p| p.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
