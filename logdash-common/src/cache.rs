//! Session-wide dataset cache
//!
//! The parsed dataset is loaded once and shared read-only. It is reloaded
//! only when the source file's modification time or length changes, or when
//! a caller explicitly invalidates it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::dataset::{load_dataset, Dataset, LoadOptions};
use crate::{Error, Result};

/// Identity of a source file version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileFingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileFingerprint {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .map_err(|e| Error::DataAccess(format!("cannot stat {}: {}", path.display(), e)))?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct CachedDataset {
    fingerprint: FileFingerprint,
    dataset: Arc<Dataset>,
}

/// Caches the dataset parsed from one source file
pub struct DatasetCache {
    path: PathBuf,
    options: LoadOptions,
    slot: Mutex<Option<CachedDataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            slot: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Current dataset, loading or reloading it if the file changed
    pub fn get(&self) -> Result<Arc<Dataset>> {
        let fingerprint = FileFingerprint::of(&self.path)?;
        let mut slot = self.lock();

        if let Some(cached) = slot.as_ref() {
            if cached.fingerprint == fingerprint {
                return Ok(Arc::clone(&cached.dataset));
            }
            info!("{} changed on disk, reloading", self.path.display());
        }

        let dataset = Arc::new(load_dataset(&self.path, &self.options)?);
        *slot = Some(CachedDataset {
            fingerprint,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop the cached dataset so the next `get` reads the file again
    pub fn invalidate(&self) {
        debug!("Invalidating dataset cache for {}", self.path.display());
        *self.lock() = None;
    }

    /// Invalidate and load immediately
    pub fn reload(&self) -> Result<Arc<Dataset>> {
        self.invalidate();
        self.get()
    }

    /// True if a dataset is currently cached
    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<CachedDataset>> {
        // The slot holds no invariant a panicking holder could break
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for DatasetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
