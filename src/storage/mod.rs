//! Artifact persistence: a key-value blob store for model state.
//!
//! The pipeline reads and writes exactly two named blobs, `embedder` and
//! `classifier` (see [`crate::constants`]). Blob contents are opaque at this
//! layer; replication and durability of the backing store are out of scope.

mod error;


pub use error::StorageError;

use std::path::PathBuf;

use tracing::debug;

/// Named-blob storage for model artifacts.
pub trait ArtifactStore: Send + Sync {
    /// Reads the blob stored under `name`, or `None` if it does not exist.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Writes `data` under `name`, replacing any existing blob.
    fn write(&self, name: &str, data: &[u8]) -> Result<(), StorageError>;
}

/// Filesystem-backed artifact store: one JSON file per blob under a root
/// directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Creates a store rooted at `root`. The directory is created on first
    /// write.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store's root directory.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.json")))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.blob_path(name)?;
        match std::fs::read(&path) {
            Ok(data) => {
                debug!(name, bytes = data.len(), "artifact read");
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.blob_path(name)?;
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(&path, data)?;
        debug!(name, bytes = data.len(), "artifact written");
        Ok(())
    }
}

/// Blob names are flat identifiers, never paths.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains(['/', '\\', '.']) {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// In-memory artifact store for tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: parking_lot::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(any(test, feature = "mock"))]
impl MemoryArtifactStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    /// Returns `true` if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.lock().is_empty()
    }
}

#[cfg(any(test, feature = "mock"))]
impl ArtifactStore for MemoryArtifactStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_name(name)?;
        Ok(self.blobs.lock().get(name).cloned())
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        validate_name(name)?;
        self.blobs.lock().insert(name.to_string(), data.to_vec());
        Ok(())
    }
}
