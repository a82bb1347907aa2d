//! Filesystem snapshot store.
//!
//! The whole rumor collection is one JSON array document at a fixed path,
//! rewritten on every mutation. On the device the path lives on a SPIFFS
//! partition mounted at boot; on the host it is any filesystem path, which
//! is what the integration tests use.
//!
//! Writes go through a sibling temp file plus rename, so a power cut mid-save
//! leaves the previous complete document in place, never a torn one.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::SnapshotStore;
use crate::app::rumor::Rumor;
use crate::error::StorageError;

pub struct FsStore {
    path: PathBuf,
}

impl FsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl SnapshotStore for FsStore {
    fn save(&self, rumors: &[Rumor]) -> Result<(), StorageError> {
        let doc = serde_json::to_vec(rumors).map_err(|_| StorageError::Io)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &doc).map_err(|e| {
            warn!("fs_store: write {} failed: {e}", tmp.display());
            StorageError::Io
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            warn!("fs_store: rename to {} failed: {e}", self.path.display());
            StorageError::Io
        })?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<Rumor>, StorageError> {
        if !self.path.exists() {
            // First boot: seed an empty document so later saves are plain
            // overwrites of a known-good file.
            self.save(&[])?;
            info!("fs_store: created empty rumor store at {}", self.path.display());
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path).map_err(|e| {
            warn!("fs_store: read {} failed: {e}", self.path.display());
            StorageError::Io
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("fs_store: snapshot undecodable: {e}");
            StorageError::Corrupted
        })
    }
}

// ── SPIFFS mount (device only) ───────────────────────────────

/// Mount the SPIFFS data partition at `/spiffs`, formatting it on first use.
#[cfg(target_os = "espidf")]
pub fn mount_storage() -> Result<(), StorageError> {
    use esp_idf_sys::{ESP_OK, esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register};

    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: called once from main before any task touches the filesystem;
    // the config struct outlives the call.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK {
        log::error!("fs_store: SPIFFS mount failed (rc={ret})");
        return Err(StorageError::Unavailable);
    }
    info!("fs_store: SPIFFS mounted at /spiffs");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn mount_storage() -> Result<(), StorageError> {
    info!("fs_store(sim): no mount needed");
    Ok(())
}
