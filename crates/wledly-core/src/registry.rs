// ── Controller registry ──
//
// The authoritative, persisted list of known controllers. One instance per
// plugin lifetime, shared by `Arc`. Every mutation writes the full snapshot
// through the SettingsStore while still holding the state lock, and rolls
// the in-memory change back if that write fails.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use wledly_api::DeviceConnector;

use crate::error::CoreError;
use crate::model::{Controller, ControllerId, RegistrySnapshot, address_key};
use crate::store::SettingsStore;

/// Result of the best-effort name lookup performed by [`ControllerRegistry::add`].
#[derive(Debug)]
pub enum NameProbe {
    /// The device answered with a non-empty name.
    Resolved(String),
    /// The device answered but has no name configured.
    NoName,
    /// The device couldn't be queried.
    Failed(CoreError),
}

impl NameProbe {
    /// Pick a display name: device name, then override, then raw address.
    pub fn display_name(&self, name_override: Option<&str>, address: &str) -> String {
        match self {
            Self::Resolved(name) => name.clone(),
            Self::NoName | Self::Failed(_) => name_override
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(address)
                .to_owned(),
        }
    }
}

struct RegistryState {
    controllers: Vec<Controller>,
    last_added_at: i64,
}

impl RegistryState {
    fn find_by_address(&self, key: &str) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.address_key() == key)
    }

    fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            controllers: self.controllers.clone(),
        }
    }

    /// Next creation timestamp, never lower than any previous one.
    fn next_added_at(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis().max(self.last_added_at);
        self.last_added_at = now;
        now
    }
}

/// Owns the in-memory controller list and its persistence.
pub struct ControllerRegistry {
    state: Mutex<RegistryState>,
    store: Arc<dyn SettingsStore>,
    connector: DeviceConnector,
}

impl ControllerRegistry {
    /// Create an empty registry. Call [`load`](Self::load) to pull in
    /// persisted state.
    pub fn new(store: Arc<dyn SettingsStore>, connector: DeviceConnector) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                controllers: Vec::new(),
                last_added_at: 0,
            }),
            store,
            connector,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Replace the in-memory set with whatever the store holds.
    ///
    /// Missing or unparsable state yields an empty registry. Safe to call
    /// again whenever the host reports that settings changed elsewhere.
    /// Duplicate addresses in the stored data keep their first entry.
    /// Returns the number of controllers loaded.
    pub async fn load(&self) -> Result<usize, CoreError> {
        let mut state = self.state.lock().await;
        let snapshot = self.store.load().await?.unwrap_or_default();

        let mut seen = HashSet::new();
        let mut controllers = Vec::with_capacity(snapshot.controllers.len());
        for controller in snapshot.controllers {
            if seen.insert(controller.address_key()) {
                controllers.push(controller);
            } else {
                warn!(
                    id = %controller.id,
                    address = %controller.address,
                    "dropping stored controller with duplicate address"
                );
            }
        }
        controllers.sort_by_key(|c| c.added_at);

        state.last_added_at = controllers
            .iter()
            .map(|c| c.added_at)
            .max()
            .unwrap_or(0)
            .max(state.last_added_at);
        state.controllers = controllers;

        debug!(count = state.controllers.len(), "registry loaded");
        Ok(state.controllers.len())
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Register a controller at `address`.
    ///
    /// If the (normalized) address is already registered, the existing
    /// entry is returned and nothing is probed or written. Otherwise the
    /// device is asked for its name with the probe timeout, a fresh id is
    /// minted, and the updated list is persisted before returning.
    pub async fn add(
        &self,
        address: &str,
        name_override: Option<&str>,
    ) -> Result<Controller, CoreError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(CoreError::InvalidCommand {
                message: "controller address is empty".into(),
            });
        }
        let key = address_key(address);

        if let Some(existing) = self.state.lock().await.find_by_address(&key) {
            debug!(id = %existing.id, address, "controller already registered");
            return Ok(existing.clone());
        }

        // Phase 1: probe without holding the lock.
        let probe = self.probe_name(address).await;
        if let NameProbe::Failed(ref e) = probe {
            debug!(address, error = %e, "name probe failed, using fallback name");
        }
        let display_name = probe.display_name(name_override, address);

        // Phase 2: commit. Someone may have added the same address while
        // we were probing.
        let mut state = self.state.lock().await;
        if let Some(existing) = state.find_by_address(&key) {
            return Ok(existing.clone());
        }

        let controller = Controller {
            id: ControllerId::new(),
            address: address.to_owned(),
            display_name,
            added_at: state.next_added_at(),
        };
        state.controllers.push(controller.clone());

        if let Err(e) = self.store.save(&state.snapshot()).await {
            state.controllers.pop();
            warn!(address, error = %e, "failed to persist new controller");
            return Err(persistence(e));
        }

        info!(id = %controller.id, address, name = %controller.display_name, "controller added");
        Ok(controller)
    }

    /// Remove the controller with `id`.
    ///
    /// Unknown ids are a no-op and return `Ok(None)` without writing.
    pub async fn remove(&self, id: &ControllerId) -> Result<Option<Controller>, CoreError> {
        let mut state = self.state.lock().await;
        let Some(index) = state.controllers.iter().position(|c| c.id == *id) else {
            debug!(%id, "remove: controller not registered");
            return Ok(None);
        };

        let removed = state.controllers.remove(index);
        if let Err(e) = self.store.save(&state.snapshot()).await {
            state.controllers.insert(index, removed);
            warn!(%id, error = %e, "failed to persist controller removal");
            return Err(persistence(e));
        }

        info!(%id, address = %removed.address, "controller removed");
        Ok(Some(removed))
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Copy of every registered controller, oldest first.
    pub async fn list(&self) -> Vec<Controller> {
        self.state.lock().await.controllers.clone()
    }

    pub async fn get_by_id(&self, id: &ControllerId) -> Option<Controller> {
        self.state
            .lock()
            .await
            .controllers
            .iter()
            .find(|c| c.id == *id)
            .cloned()
    }

    pub async fn has_address(&self, address: &str) -> bool {
        let key = address_key(address);
        self.state.lock().await.find_by_address(&key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.controllers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.controllers.is_empty()
    }

    /// Connector used for probes; dispatch shares it.
    pub fn connector(&self) -> &DeviceConnector {
        &self.connector
    }

    // ── Helpers ──────────────────────────────────────────────────

    async fn probe_name(&self, address: &str) -> NameProbe {
        let client = match self.connector.connect(address) {
            Ok(client) => client,
            Err(e) => return NameProbe::Failed(e.into()),
        };
        match client.get_info_within(self.connector.timeouts().probe).await {
            Ok(info) => info
                .display_name()
                .map_or(NameProbe::NoName, |name| NameProbe::Resolved(name.to_owned())),
            Err(e) => NameProbe::Failed(e.into()),
        }
    }
}

fn persistence(err: CoreError) -> CoreError {
    match err {
        CoreError::Persistence { .. } => err,
        other => CoreError::Persistence {
            message: other.to_string(),
        },
    }
}
