// Adapters layer: concrete preference stores and backend selection.

#[cfg(target_os = "macos")]
pub mod core_foundation;
pub mod memory;
pub mod snapshot;

use crate::domain::ports::PreferenceStore;
use crate::utils::error::{PrefError, Result};
use std::path::{Path, PathBuf};

/// Which store answers preference queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveBackend {
    CoreFoundation,
    Snapshot(PathBuf),
}

impl ActiveBackend {
    /// A snapshot always wins; otherwise the system store, where there is one.
    pub fn select(snapshot: Option<&Path>) -> Result<Self> {
        if let Some(path) = snapshot {
            return Ok(ActiveBackend::Snapshot(path.to_path_buf()));
        }
        if cfg!(target_os = "macos") {
            Ok(ActiveBackend::CoreFoundation)
        } else {
            Err(PrefError::StoreUnavailable {
                message: "CoreFoundation preferences exist only on macOS".to_string(),
            })
        }
    }

    pub fn open(&self) -> Result<Box<dyn PreferenceStore>> {
        tracing::info!(backend = ?self, "opening preference store");
        match self {
            ActiveBackend::Snapshot(path) => Ok(Box::new(snapshot::SnapshotStore::from_file(path)?)),
            ActiveBackend::CoreFoundation => open_system_store(),
        }
    }
}

#[cfg(target_os = "macos")]
fn open_system_store() -> Result<Box<dyn PreferenceStore>> {
    Ok(Box::new(core_foundation::CoreFoundationStore::new()))
}

#[cfg(not(target_os = "macos"))]
fn open_system_store() -> Result<Box<dyn PreferenceStore>> {
    Err(PrefError::StoreUnavailable {
        message: "CoreFoundation preferences exist only on macOS".to_string(),
    })
}
