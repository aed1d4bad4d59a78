// wledly-api: Async Rust client for the WLED JSON API

pub mod address;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use address::{DEFAULT_PORT, DeviceAddress};
pub use client::{DeviceClient, DeviceConnector};
pub use error::Error;
pub use models::{DeviceInfo, DeviceState, PowerSetting, Preset, StatePatch};
pub use transport::{RequestTimeouts, TransportConfig};
