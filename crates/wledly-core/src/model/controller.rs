use serde::{Deserialize, Serialize};
use wledly_api::DeviceAddress;

use super::ControllerId;

/// A registered WLED controller.
///
/// Field names follow the persisted settings schema
/// (`{id, address, displayName, addedAt}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    pub id: ControllerId,
    /// Raw `host` or `host:port` as entered or discovered.
    pub address: String,
    pub display_name: String,
    /// Epoch milliseconds. Non-decreasing across adds; ordering only.
    pub added_at: i64,
}

impl Controller {
    /// Comparison key for duplicate-address suppression.
    pub fn address_key(&self) -> String {
        address_key(&self.address)
    }
}

/// Normalize a raw address for equality checks: trimmed, lower-cased host,
/// default port spelled out.
pub fn address_key(address: &str) -> String {
    DeviceAddress::parse(address).normalized()
}

/// The full persisted registry state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub controllers: Vec<Controller>,
}

/// A device that answered an mDNS scan. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    pub address: String,
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_uses_settings_schema() {
        let id: ControllerId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        let snapshot = RegistrySnapshot {
            controllers: vec![Controller {
                id,
                address: "192.168.1.50".into(),
                display_name: "Desk".into(),
                added_at: 1_700_000_000_000,
            }],
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({
                "controllers": [{
                    "id": "550e8400-e29b-41d4-a716-446655440000",
                    "address": "192.168.1.50",
                    "displayName": "Desk",
                    "addedAt": 1_700_000_000_000_i64
                }]
            })
        );
    }

    #[test]
    fn snapshot_without_controllers_key_is_empty() {
        let snapshot: RegistrySnapshot = serde_json::from_value(json!({})).unwrap();
        assert!(snapshot.controllers.is_empty());
    }

    #[test]
    fn address_key_collapses_equivalent_spellings() {
        assert_eq!(address_key("WLED.lan"), address_key(" wled.lan:80"));
        assert_ne!(address_key("wled.lan"), address_key("wled.lan:8080"));
    }
}
