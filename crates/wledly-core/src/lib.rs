//! Controller registry, LAN discovery and multi-device dispatch for WLED.
//!
//! The [`Plugin`] context owns one [`ControllerRegistry`] per installation,
//! persisted through an injected [`SettingsStore`]. Commands are fanned out
//! by the [`DispatchCoordinator`], which waits for every device to settle
//! before reporting a [`Verdict`]. [`DiscoveryScanner`] finds new devices
//! over mDNS.

pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod plugin;
pub mod registry;
pub mod store;

pub use config::{RuntimeConfig, WLED_SERVICE};
pub use discovery::{
    DiscoveryScanner, MdnsQuerier, MdnsQuery, MdnsRecord, MdnsResponse, MdnsSdQuerier,
    QueryEvent, RecordData,
};
pub use dispatch::{
    DeviceOutcome, DispatchCommand, DispatchCoordinator, DispatchOutcome, MAX_PRESET_ID, Verdict,
    validate_preset,
};
pub use error::CoreError;
pub use model::{Controller, ControllerId, DiscoveredDevice, RegistrySnapshot};
pub use plugin::Plugin;
pub use registry::{ControllerRegistry, NameProbe};
pub use store::{MemoryStore, SettingsStore};

// Device-level types hosts need without depending on wledly-api directly.
pub use wledly_api::{DeviceClient, DeviceInfo, DeviceState, PowerSetting, Preset, RequestTimeouts};
