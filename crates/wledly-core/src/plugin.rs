// ── Plugin context ──
//
// Wires one registry, one dispatcher and one scanner together for a
// single installation. Hosts construct exactly one of these at startup
// and pass it (or its parts) wherever they're needed.

use std::sync::Arc;

use tracing::{info, warn};

use wledly_api::DeviceConnector;

use crate::config::RuntimeConfig;
use crate::discovery::{DiscoveryScanner, MdnsQuerier, MdnsSdQuerier};
use crate::dispatch::DispatchCoordinator;
use crate::error::CoreError;
use crate::model::{Controller, DiscoveredDevice};
use crate::registry::ControllerRegistry;
use crate::store::SettingsStore;

pub struct Plugin {
    config: RuntimeConfig,
    registry: Arc<ControllerRegistry>,
    dispatcher: DispatchCoordinator,
    scanner: DiscoveryScanner,
}

impl Plugin {
    /// Build the context on the real mDNS backend and load persisted state.
    pub async fn start(
        config: RuntimeConfig,
        store: Arc<dyn SettingsStore>,
    ) -> Result<Self, CoreError> {
        Self::start_with_querier(config, store, Arc::new(MdnsSdQuerier::new())).await
    }

    /// Same as [`start`](Self::start) with a caller-supplied discovery backend.
    pub async fn start_with_querier(
        config: RuntimeConfig,
        store: Arc<dyn SettingsStore>,
        querier: Arc<dyn MdnsQuerier>,
    ) -> Result<Self, CoreError> {
        let connector = DeviceConnector::new(&config.transport())?;
        let registry = Arc::new(ControllerRegistry::new(store, connector));
        registry.load().await?;

        let dispatcher = DispatchCoordinator::new(Arc::clone(&registry));
        let scanner = DiscoveryScanner::new(querier, config.service.clone());

        Ok(Self {
            config,
            registry,
            dispatcher,
            scanner,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ControllerRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &DispatchCoordinator {
        &self.dispatcher
    }

    pub fn scanner(&self) -> &DiscoveryScanner {
        &self.scanner
    }

    /// Scan for the configured budget.
    pub async fn scan(&self) -> Vec<DiscoveredDevice> {
        self.scanner.scan(self.config.scan_timeout).await
    }

    /// Register every discovered device that isn't already known.
    ///
    /// The announced name is passed as the fallback in case the device
    /// doesn't answer the name probe. Stops at the first persistence
    /// failure; controllers added before it stay added.
    pub async fn adopt(&self, found: &[DiscoveredDevice]) -> Result<Vec<Controller>, CoreError> {
        let mut added = Vec::new();
        for device in found {
            if self.registry.has_address(&device.address).await {
                continue;
            }
            match self.registry.add(&device.address, Some(&device.name)).await {
                Ok(controller) => added.push(controller),
                Err(e @ CoreError::Persistence { .. }) => return Err(e),
                Err(e) => warn!(address = %device.address, error = %e, "skipping discovered device"),
            }
        }
        info!(count = added.len(), "adopted discovered controllers");
        Ok(added)
    }
}
