//! Shared helpers for command handlers.

use std::io::IsTerminal;

use wledly_core::{Controller, ControllerId, ControllerRegistry, model::address_key};

use crate::cli::TargetArgs;
use crate::error::CliError;

/// Resolve a controller by ID, address, or display name.
///
/// Names match case-insensitively and must be unambiguous.
pub async fn resolve_controller(
    registry: &ControllerRegistry,
    identifier: &str,
) -> Result<Controller, CliError> {
    let all = registry.list().await;
    let needle = identifier.trim();

    if let Ok(id) = needle.parse::<ControllerId>() {
        if let Some(found) = all.iter().find(|c| c.id == id) {
            return Ok(found.clone());
        }
    }

    let key = address_key(needle);
    if let Some(found) = all.iter().find(|c| c.address_key() == key) {
        return Ok(found.clone());
    }

    let mut by_name = all
        .iter()
        .filter(|c| c.display_name.eq_ignore_ascii_case(needle));
    match (by_name.next(), by_name.next()) {
        (Some(found), None) => Ok(found.clone()),
        (Some(_), Some(_)) => Err(CliError::Validation {
            field: "controller".into(),
            reason: format!("'{identifier}' matches more than one controller; use its ID"),
        }),
        (None, _) => Err(CliError::NotFound {
            identifier: identifier.into(),
        }),
    }
}

/// Turn command-line targets into controller IDs.
///
/// Well-formed IDs that aren't registered are passed through so the
/// dispatcher can report them as stale. Anything else has to resolve.
pub async fn resolve_targets(
    registry: &ControllerRegistry,
    targets: &TargetArgs,
) -> Result<Vec<ControllerId>, CliError> {
    if targets.all {
        return Ok(registry.list().await.into_iter().map(|c| c.id).collect());
    }

    let mut ids = Vec::with_capacity(targets.controllers.len());
    for identifier in &targets.controllers {
        match resolve_controller(registry, identifier).await {
            Ok(controller) => ids.push(controller.id),
            Err(not_found @ CliError::NotFound { .. }) => match identifier.parse::<ControllerId>() {
                Ok(id) => ids.push(id),
                Err(_) => return Err(not_found),
            },
            Err(e) => return Err(e),
        }
    }
    Ok(ids)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Split a `CONTROLLER=PRESET` mapping.
pub fn parse_mapping(raw: &str) -> Result<(&str, u16), CliError> {
    let invalid = |reason: &str| CliError::Validation {
        field: "map".into(),
        reason: format!("'{raw}': {reason}"),
    };

    let (controller, preset) = raw
        .rsplit_once('=')
        .ok_or_else(|| invalid("expected CONTROLLER=PRESET"))?;
    let controller = controller.trim();
    if controller.is_empty() {
        return Err(invalid("missing controller"));
    }
    let preset = preset
        .trim()
        .parse::<u16>()
        .map_err(|_| invalid("preset must be a number"))?;
    Ok((controller, preset))
}
