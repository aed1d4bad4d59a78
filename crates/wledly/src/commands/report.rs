//! Per-controller results of a dispatch, shared by `power` and `preset`.

use serde::Serialize;
use tabled::Tabled;

use wledly_core::{ControllerRegistry, DeviceOutcome, DispatchOutcome};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceResult {
    id: String,
    name: Option<String>,
    address: Option<String>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Controller")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Result")]
    status: String,
    #[tabled(rename = "Detail")]
    error: String,
}

/// Print what happened to each controller and turn any failure into
/// a single error.
pub async fn finish(
    registry: &ControllerRegistry,
    outcome: &DispatchOutcome,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut results = Vec::new();
    for (id, device) in outcome.iter() {
        let controller = registry.get_by_id(id).await;
        let (status, error) = match device {
            DeviceOutcome::Succeeded => ("ok", None),
            DeviceOutcome::Failed(e) => ("failed", Some(e.to_string())),
            DeviceOutcome::InvalidTarget => ("unknown", None),
        };
        results.push(DeviceResult {
            id: id.to_string(),
            name: controller.as_ref().map(|c| c.display_name.clone()),
            address: controller.map(|c| c.address),
            status,
            error,
        });
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &results,
        |r| ResultRow {
            name: r.name.clone().unwrap_or_else(|| r.id.clone()),
            address: r.address.clone().unwrap_or_else(|| "-".into()),
            status: output::status(r.status == "ok", r.status, color),
            error: r.error.clone().unwrap_or_default(),
        },
        |r| format!("{} {}", r.id, r.status),
    );
    output::print_output(&out, global.quiet);

    if outcome.any_failed() {
        return Err(CliError::DispatchFailed {
            failed: outcome.failure_count(),
            total: outcome.dispatched(),
        });
    }
    Ok(())
}
