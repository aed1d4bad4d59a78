// ── File-backed settings store ──
//
// One JSON document per installation, in the registry snapshot schema.
// Writes go to a sibling temp file which is then renamed over the target,
// so a crash mid-write leaves the previous list intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use wledly_core::{CoreError, RegistrySnapshot, SettingsStore};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, action: &str, err: &std::io::Error) -> CoreError {
        CoreError::Persistence {
            message: format!("failed to {action} {}: {err}", self.path.display()),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load(&self) -> Result<Option<RegistrySnapshot>, CoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error("read", &e)),
        };

        match serde_json::from_str::<RegistrySnapshot>(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unparsable settings file");
                Ok(None)
            }
        }
    }

    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), CoreError> {
        let body = serde_json::to_vec_pretty(snapshot).map_err(|e| CoreError::Persistence {
            message: format!("failed to encode settings: {e}"),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error("create directory for", &e))?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| self.io_error("write", &e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error("replace", &e));
        }

        debug!(path = %self.path.display(), controllers = snapshot.controllers.len(), "settings saved");
        Ok(())
    }
}
