use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::SettingsStore;
use crate::error::CoreError;
use crate::model::RegistrySnapshot;

/// In-process [`SettingsStore`]. Nothing survives the process.
///
/// Saves can be made to fail on demand, which is how the registry's
/// rollback path is exercised.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<RegistrySnapshot>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `snapshot` already persisted.
    pub fn with_snapshot(snapshot: RegistrySnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// What a fresh `load` would return right now.
    pub fn persisted(&self) -> Option<RegistrySnapshot> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }

    /// Overwrite the stored snapshot behind the registry's back, the way
    /// another process sharing the same settings would.
    pub fn replace(&self, snapshot: RegistrySnapshot) {
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = Some(snapshot);
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Option<RegistrySnapshot>, CoreError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| CoreError::Internal("settings lock poisoned".into()))?;
        Ok(guard.clone())
    }

    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), CoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence {
                message: "memory store is configured to fail".into(),
            });
        }

        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| CoreError::Internal("settings lock poisoned".into()))?;
        *guard = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
