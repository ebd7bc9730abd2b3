//! Key/value blob persistence contract.
//!
//! The access engine only needs `load(key)` and `save(key, bytes)` from its
//! persistence substrate. This module defines that contract as a trait so the
//! backend (memory, local files, Redis, Postgres) can be swapped without
//! changing engine logic.
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_core::blob_store::{BlobStore, LocalBlobStore};
//! use std::path::PathBuf;
//!
//! let store = LocalBlobStore::new(PathBuf::from("./storage/access"));
//!
//! store.save("schoolgate:access:settingsControls", br#"{"Admin":{}}"#).await?;
//! let payload = store.load("schoolgate:access:settingsControls").await?;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

/// Boxed future returned by [`BlobStore`] operations.
pub type BlobFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Abstract trait for key/value blob backends.
///
/// Implementations can be swapped without changing business logic.
pub trait BlobStore: Send + Sync {
    /// Load the payload stored under `key`.
    ///
    /// # Returns
    /// `Ok(None)` when nothing has been stored under the key yet.
    fn load<'a>(&'a self, key: &'a str) -> BlobFuture<'a, Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous payload.
    fn save<'a>(&'a self, key: &'a str, bytes: &'a [u8]) -> BlobFuture<'a, ()>;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;
}

/// Error type for blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error (file system or similar).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid storage key format.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend-specific failure (Redis, Postgres, ...).
    #[error("{backend} error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(backend: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            backend,
            message: err.to_string(),
        }
    }
}

/// Process-local blob store.
///
/// Not durable: everything is lost on restart. Used in tests and when no
/// backend is configured.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlobStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load<'a>(&'a self, key: &'a str) -> BlobFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move { Ok(self.entries.read().await.get(key).cloned()) })
    }

    fn save<'a>(&'a self, key: &'a str, bytes: &'a [u8]) -> BlobFuture<'a, ()> {
        Box::pin(async move {
            self.entries
                .write()
                .await
                .insert(key.to_string(), bytes.to_vec());
            Ok(())
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Local filesystem-based blob store.
///
/// Each key is stored as one `<key>.json` file under `base_dir`, with `:`
/// separators mapped to `.` so keys stay portable file names.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    /// Base directory where payloads are stored
    base_dir: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at `base_dir`.
    ///
    /// The directory is created lazily on first write.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StoreError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StoreError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ':' || c == '.')
        {
            return Err(StoreError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        Self::validate_key(key)?;
        Ok(self
            .base_dir
            .join(format!("{}.json", key.replace(':', "."))))
    }
}

impl BlobStore for LocalBlobStore {
    fn load<'a>(&'a self, key: &'a str) -> BlobFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            let path = self.path_for(key)?;

            match fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn save<'a>(&'a self, key: &'a str, bytes: &'a [u8]) -> BlobFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            fs::create_dir_all(&self.base_dir).await?;

            // Write beside the target and rename so readers never see a torn payload
            let tmp_path = path.with_extension("json.tmp");
            fs::write(&tmp_path, bytes).await?;
            fs::rename(&tmp_path, &path).await?;

            debug!(store.key = %key, store.bytes = bytes.len(), "Payload written");
            Ok(())
        })
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_valid_keys() {
        assert!(LocalBlobStore::validate_key("schoolgate:access:rolePermissions").is_ok());
        assert!(LocalBlobStore::validate_key("dashboardControls").is_ok());
        assert!(LocalBlobStore::validate_key("tenant-1:access:settings_controls").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_path_traversal() {
        assert!(LocalBlobStore::validate_key("../../../etc/passwd").is_err());
        assert!(LocalBlobStore::validate_key("..\\windows\\system32").is_err());
    }

    #[test]
    fn test_validate_key_rejects_absolute_paths() {
        assert!(LocalBlobStore::validate_key("/etc/passwd").is_err());
        assert!(LocalBlobStore::validate_key("a/b").is_err());
    }

    #[test]
    fn test_path_maps_separators() {
        let store = LocalBlobStore::new(PathBuf::from("/tmp/access"));
        let path = store.path_for("schoolgate:access:rolePermissions").unwrap();
        assert_eq!(
            path,
            PathBuf::from("/tmp/access/schoolgate.access.rolePermissions.json")
        );
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryBlobStore::new();
        assert!(store.load("k").await.unwrap().is_none());

        store.save("k", b"{\"a\":1}").await.unwrap();
        assert_eq!(store.load("k").await.unwrap().as_deref(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_local_store_missing_key_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_path_buf());
        assert!(store.load("schoolgate:access:teachersControls").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_store_overwrites_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("nested"));

        store.save("schoolgate:access:x", b"first").await.unwrap();
        store.save("schoolgate:access:x", b"second").await.unwrap();

        let loaded = store.load("schoolgate:access:x").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(&b"second"[..]));
    }
}
