// Integration tests for `ControllerRegistry` against wiremock devices.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wledly_api::{DeviceConnector, TransportConfig};
use wledly_core::{
    Controller, ControllerId, ControllerRegistry, CoreError, MemoryStore, RegistrySnapshot,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn registry_with(store: Arc<MemoryStore>) -> ControllerRegistry {
    let connector = DeviceConnector::new(&TransportConfig::default()).unwrap();
    ControllerRegistry::new(store, connector)
}

async fn named_device(name: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ver": "0.14.0",
            "name": name,
            "udpport": 21324,
            "live": false,
            "fxcount": 118,
            "palcount": 71
        })))
        .mount(&server)
        .await;
    server
}

/// An address nothing is listening on.
fn dead_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

// ── add ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_uses_device_name() {
    let server = named_device("Kitchen").await;
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store));

    let address = server.address().to_string();
    let controller = registry.add(&address, Some("ignored")).await.unwrap();

    assert_eq!(controller.display_name, "Kitchen");
    assert_eq!(controller.address, address);
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.persisted().unwrap().controllers, vec![controller]);
}

#[tokio::test]
async fn test_add_falls_back_when_probe_fails() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(store);

    let address = dead_address();
    let named = registry.add(&address, Some("Porch")).await.unwrap();
    assert_eq!(named.display_name, "Porch");

    let other = dead_address();
    let unnamed = registry.add(&other, None).await.unwrap();
    assert_eq!(unnamed.display_name, other);
}

#[tokio::test]
async fn test_add_falls_back_when_device_has_no_name() {
    let server = named_device("   ").await;
    let registry = registry_with(Arc::new(MemoryStore::new()));

    let controller = registry
        .add(&server.address().to_string(), Some("Desk"))
        .await
        .unwrap();
    assert_eq!(controller.display_name, "Desk");
}

#[tokio::test]
async fn test_add_probe_is_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "Slow"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let registry = registry_with(Arc::new(MemoryStore::new()));
    let address = server.address().to_string();

    let started = std::time::Instant::now();
    let controller = registry.add(&address, None).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(controller.display_name, address);
}

#[tokio::test]
async fn test_add_duplicate_returns_existing_entry() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store));

    let address = dead_address();
    let first = registry.add(&address, None).await.unwrap();
    let again = registry.add(&format!("  {}  ", address.to_uppercase()), None).await.unwrap();

    assert_eq!(first, again);
    assert_eq!(registry.len().await, 1);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn test_default_port_spelling_is_a_duplicate() {
    let registry = registry_with(Arc::new(MemoryStore::new()));

    let first = registry.add("wled-nonexistent.invalid", None).await.unwrap();
    let second = registry.add("wled-nonexistent.invalid:80", None).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(registry.list().await.len(), 1);
}

#[tokio::test]
async fn test_add_rejects_blank_address() {
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let err = registry.add("   ", None).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidCommand { .. }));
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_added_at_is_non_decreasing() {
    let registry = registry_with(Arc::new(MemoryStore::new()));
    let a = registry.add(&dead_address(), None).await.unwrap();
    let b = registry.add(&dead_address(), None).await.unwrap();
    assert!(b.added_at >= a.added_at);
    assert_eq!(registry.list().await, vec![a, b]);
}

// ── remove ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_remove_keeps_other_ids_stable() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store));

    let keep = registry.add(&dead_address(), None).await.unwrap();
    let drop_me = registry.add(&dead_address(), None).await.unwrap();

    let removed = registry.remove(&drop_me.id).await.unwrap();
    assert_eq!(removed, Some(drop_me));

    let remaining = registry.list().await;
    assert_eq!(remaining, vec![keep.clone()]);
    assert_eq!(registry.get_by_id(&keep.id).await, Some(keep));
    assert_eq!(store.save_count(), 3);
}

#[tokio::test]
async fn test_remove_unknown_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store));

    let removed = registry.remove(&ControllerId::new()).await.unwrap();
    assert!(removed.is_none());
    assert_eq!(store.save_count(), 0);
}

// ── Persistence failures ────────────────────────────────────────────

#[tokio::test]
async fn test_failed_add_rolls_back() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store));
    store.fail_saves(true);

    let err = registry.add(&dead_address(), None).await.unwrap_err();
    assert!(matches!(err, CoreError::Persistence { .. }));
    assert!(registry.is_empty().await);
    assert!(store.persisted().is_none());
}

#[tokio::test]
async fn test_failed_remove_rolls_back() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store));

    let a = registry.add(&dead_address(), None).await.unwrap();
    let b = registry.add(&dead_address(), None).await.unwrap();
    store.fail_saves(true);

    let err = registry.remove(&a.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Persistence { .. }));
    assert_eq!(registry.list().await, vec![a, b]);
}

// ── load ────────────────────────────────────────────────────────────

fn stored(address: &str, added_at: i64) -> Controller {
    Controller {
        id: ControllerId::new(),
        address: address.into(),
        display_name: address.into(),
        added_at,
    }
}

#[tokio::test]
async fn test_load_replaces_state_and_is_idempotent() {
    let store = Arc::new(MemoryStore::with_snapshot(RegistrySnapshot {
        controllers: vec![stored("10.0.0.2", 20), stored("10.0.0.1", 10)],
    }));
    let registry = registry_with(Arc::clone(&store));

    assert_eq!(registry.load().await.unwrap(), 2);
    let first = registry.list().await;
    assert_eq!(first[0].address, "10.0.0.1");

    assert_eq!(registry.load().await.unwrap(), 2);
    assert_eq!(registry.list().await, first);

    store.replace(RegistrySnapshot::default());
    assert_eq!(registry.load().await.unwrap(), 0);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_load_empty_store() {
    let registry = registry_with(Arc::new(MemoryStore::new()));
    assert_eq!(registry.load().await.unwrap(), 0);
}

#[tokio::test]
async fn test_load_drops_duplicate_addresses() {
    let original = stored("10.0.0.1", 10);
    let store = Arc::new(MemoryStore::with_snapshot(RegistrySnapshot {
        controllers: vec![original.clone(), stored("10.0.0.1:80", 11)],
    }));
    let registry = registry_with(store);

    assert_eq!(registry.load().await.unwrap(), 1);
    assert_eq!(registry.list().await, vec![original]);
}

#[tokio::test]
async fn test_new_ids_survive_reload() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry_with(Arc::clone(&store));
    let added = registry.add(&dead_address(), None).await.unwrap();

    let reopened = registry_with(store);
    reopened.load().await.unwrap();
    assert_eq!(reopened.get_by_id(&added.id).await, Some(added.clone()));
    assert!(reopened.has_address(&added.address).await);
}

#[tokio::test]
async fn test_list_is_a_copy() {
    let registry = registry_with(Arc::new(MemoryStore::new()));
    registry.add(&dead_address(), None).await.unwrap();

    let mut copy = registry.list().await;
    copy.clear();
    assert_eq!(registry.len().await, 1);
}
