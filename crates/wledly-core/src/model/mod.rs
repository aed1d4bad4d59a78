// ── Domain model ──

mod controller;
mod controller_id;

pub use controller::{Controller, DiscoveredDevice, RegistrySnapshot, address_key};
pub use controller_id::ControllerId;
