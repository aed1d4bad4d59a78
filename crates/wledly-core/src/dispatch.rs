// ── Multi-device dispatch ──
//
// Resolves controller ids through the registry and fans one logical
// command out to every resolved device at once. Each request is spawned
// as its own task with its own timeout; the dispatch resolves only after
// every task has settled, and one device's failure never cancels or
// delays another. Dropping the dispatch future does not abort requests
// that are already in flight.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use wledly_api::{DeviceClient, PowerSetting};

use crate::error::CoreError;
use crate::model::{Controller, ControllerId};
use crate::registry::ControllerRegistry;

/// Highest preset slot WLED accepts.
pub const MAX_PRESET_ID: u16 = 250;

// ── Commands ─────────────────────────────────────────────────────

/// A logical command for a set of controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchCommand {
    /// Power on, off, or toggle every target.
    SetPower(PowerSetting),
    /// Activate the same preset on every target.
    ActivatePreset(u16),
    /// Per-controller preset mapping. Targets without an entry are skipped.
    ActivatePresets(BTreeMap<ControllerId, u16>),
}

impl DispatchCommand {
    fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::SetPower(_) => Ok(()),
            Self::ActivatePreset(id) => validate_preset(*id),
            Self::ActivatePresets(map) => map.values().try_for_each(|id| validate_preset(*id)),
        }
    }

    /// What to send to one controller, or `None` to leave it alone.
    fn action_for(&self, id: &ControllerId) -> Option<DeviceAction> {
        match self {
            Self::SetPower(setting) => Some(DeviceAction::Power(*setting)),
            Self::ActivatePreset(preset) => Some(DeviceAction::Preset(*preset)),
            Self::ActivatePresets(map) => map.get(id).copied().map(DeviceAction::Preset),
        }
    }
}

/// Reject preset ids outside `1..=MAX_PRESET_ID`.
pub fn validate_preset(id: u16) -> Result<(), CoreError> {
    if (1..=MAX_PRESET_ID).contains(&id) {
        Ok(())
    } else {
        Err(CoreError::InvalidCommand {
            message: format!("preset id {id} is outside 1..={MAX_PRESET_ID}"),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum DeviceAction {
    Power(PowerSetting),
    Preset(u16),
}

impl DeviceAction {
    async fn apply(self, client: &DeviceClient) -> Result<(), wledly_api::Error> {
        match self {
            Self::Power(PowerSetting::Toggle) => client.toggle_power().await,
            Self::Power(PowerSetting::On) => client.set_power(true).await,
            Self::Power(PowerSetting::Off) => client.set_power(false).await,
            Self::Preset(id) => client.activate_preset(id).await,
        }
    }
}

// ── Outcomes ─────────────────────────────────────────────────────

/// What happened to one target.
#[derive(Debug)]
pub enum DeviceOutcome {
    Succeeded,
    /// The request was sent but the device or network failed it.
    Failed(CoreError),
    /// The id no longer resolves to a registered controller.
    InvalidTarget,
}

impl DeviceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Aggregate verdict across every dispatched device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AllSucceeded,
    PartialFailure { succeeded: usize, failed: usize },
    AllFailed,
}

/// Per-device results of one dispatch call.
///
/// Stale ids show up as [`DeviceOutcome::InvalidTarget`] for diagnostics
/// but don't count toward the verdict.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    results: BTreeMap<ControllerId, DeviceOutcome>,
}

impl DispatchOutcome {
    pub fn verdict(&self) -> Verdict {
        let (mut succeeded, mut failed) = (0, 0);
        for outcome in self.results.values() {
            match outcome {
                DeviceOutcome::Succeeded => succeeded += 1,
                DeviceOutcome::Failed(_) => failed += 1,
                DeviceOutcome::InvalidTarget => {}
            }
        }
        match (succeeded, failed) {
            (_, 0) => Verdict::AllSucceeded,
            (0, _) => Verdict::AllFailed,
            (succeeded, failed) => Verdict::PartialFailure { succeeded, failed },
        }
    }

    /// The single signal the host cares about.
    pub fn any_failed(&self) -> bool {
        self.verdict() != Verdict::AllSucceeded
    }

    /// Dispatched devices that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&ControllerId, &CoreError)> {
        self.results.iter().filter_map(|(id, outcome)| match outcome {
            DeviceOutcome::Failed(e) => Some((id, e)),
            _ => None,
        })
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn get(&self, id: &ControllerId) -> Option<&DeviceOutcome> {
        self.results.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ControllerId, &DeviceOutcome)> {
        self.results.iter()
    }

    /// Number of devices a request was actually sent to.
    pub fn dispatched(&self) -> usize {
        self.results
            .values()
            .filter(|o| !matches!(o, DeviceOutcome::InvalidTarget))
            .count()
    }
}

// ── Coordinator ──────────────────────────────────────────────────

/// Fans commands out to registered controllers.
#[derive(Clone)]
pub struct DispatchCoordinator {
    registry: Arc<ControllerRegistry>,
}

impl DispatchCoordinator {
    pub fn new(registry: Arc<ControllerRegistry>) -> Self {
        Self { registry }
    }

    /// Send `command` to every controller in `targets`.
    ///
    /// Returns `Err(InvalidCommand)` for an out-of-range preset and
    /// `Err(NoTargets)` if nothing resolves, in both cases before any
    /// network call. Device failures never produce `Err`; inspect the
    /// returned outcome instead.
    pub async fn dispatch(
        &self,
        targets: &[ControllerId],
        command: &DispatchCommand,
    ) -> Result<DispatchOutcome, CoreError> {
        command.validate()?;

        let mut outcome = DispatchOutcome::default();
        let mut plan: Vec<(Controller, DeviceAction)> = Vec::new();
        let mut seen = HashSet::new();

        for id in targets {
            if !seen.insert(*id) {
                continue;
            }
            let Some(controller) = self.registry.get_by_id(id).await else {
                debug!(%id, "dropping stale dispatch target");
                outcome.results.insert(*id, DeviceOutcome::InvalidTarget);
                continue;
            };
            if let Some(action) = command.action_for(id) {
                plan.push((controller, action));
            }
        }

        if plan.is_empty() {
            return Err(CoreError::NoTargets);
        }

        // Launch everything before awaiting anything.
        let (ids, handles): (Vec<_>, Vec<_>) = plan
            .into_iter()
            .map(|(controller, action)| {
                let client = self.registry.connector().connect(&controller.address);
                let handle = tokio::spawn(async move {
                    let client = client?;
                    action.apply(&client).await
                });
                (controller.id, handle)
            })
            .unzip();

        let settled = join_all(handles).await;

        for (id, result) in ids.into_iter().zip(settled) {
            let device = match result {
                Ok(Ok(())) => DeviceOutcome::Succeeded,
                Ok(Err(e)) => {
                    warn!(%id, error = %e, "controller command failed");
                    DeviceOutcome::Failed(e.into())
                }
                Err(join_err) => {
                    warn!(%id, error = %join_err, "controller task aborted");
                    DeviceOutcome::Failed(CoreError::Internal(join_err.to_string()))
                }
            };
            outcome.results.insert(id, device);
        }

        debug!(
            dispatched = outcome.dispatched(),
            failed = outcome.failure_count(),
            verdict = ?outcome.verdict(),
            "dispatch settled"
        );
        Ok(outcome)
    }
}
