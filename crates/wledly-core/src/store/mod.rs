// ── Persistence port ──
//
// The registry never touches disk. It hands full snapshots to a
// SettingsStore and reads them back on load; where they live is the
// host's business.

mod memory;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::RegistrySnapshot;

pub use memory::MemoryStore;

/// Host-provided key-value settings storage for one plugin installation.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the persisted snapshot.
    ///
    /// `Ok(None)` means nothing valid is stored (first run, or the stored
    /// value doesn't parse). `Err` is reserved for the store itself
    /// failing.
    async fn load(&self) -> Result<Option<RegistrySnapshot>, CoreError>;

    /// Durably replace the persisted snapshot.
    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), CoreError>;
}
