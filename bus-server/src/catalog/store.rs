//! Snapshot persistence.
//!
//! Catalogs are stored as pretty-printed JSON files in one directory. A
//! missing or unreadable snapshot loads as the caller's default, so a bad
//! file never stops reconciliation; it gets overwritten on the next change.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Known stops.
pub const STOP_LIST: &str = "stop-list.json";
/// Route codes seen per line.
pub const ROUTE_CODES: &str = "route-codes.json";
/// Every line label ever seen.
pub const ROUTE_NUMBERS: &str = "route-numbers.json";

/// Errors from reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Named JSON snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Read a snapshot. `Ok(None)` when it doesn't exist yet.
    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError>;

    /// Replace a snapshot.
    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError>;

    /// Read a snapshot, falling back to `default` when it is missing or bad.
    fn load_or<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.read(name) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(snapshot = name, error = %e, "unreadable snapshot, using default");
                default
            }
        }
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        self.load_or(name, T::default())
    }
}

/// Snapshots as files in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.path(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    /// Writes to a sibling temp file first, so readers never see a partial
    /// snapshot.
    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        if !self.dir.as_os_str().is_empty() && !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = self.path(name);
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        let tmp = self.path(&format!("{name}.tmp"));
        std::fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })?;

        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
