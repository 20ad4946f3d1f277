//! Binary content store for ingested media
//! Uses Apache Arrow object_store crate

use object_store::{ObjectStore, path::Path as StoragePath};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Metadata returned after a media payload is written
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub etag: Option<String>,
    pub size: usize,
}

/// Content store wrapping object_store
#[derive(Clone)]
pub struct ContentStore {
    store: Arc<dyn ObjectStore>,
    pub bucket: String,
}

impl ContentStore {
    /// Create a store over any object_store backend
    pub fn new(store: Arc<dyn ObjectStore>, bucket: String) -> Self {
        Self { store, bucket }
    }

    /// In-memory store for tests and development
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(object_store::memory::InMemory::new()),
            bucket: "mediabox-local".to_string(),
        }
    }

    /// Filesystem-backed store rooted at the given directory
    pub fn local(root: impl AsRef<std::path::Path>, bucket: String) -> Result<Self> {
        let store = object_store::local::LocalFileSystem::new_with_prefix(root)?;
        Ok(Self {
            store: Arc::new(store),
            bucket,
        })
    }

    /// Build a store from configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => Ok(Self {
                store: Arc::new(object_store::memory::InMemory::new()),
                bucket: config.bucket.clone(),
            }),
            StorageBackend::Local => {
                std::fs::create_dir_all(&config.root)
                    .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
                Self::local(&config.root, config.bucket.clone())
            }
        }
    }

    /// Write a media payload under the given key
    pub async fn put(&self, key: &str, data: Vec<u8>) -> Result<StoredObject> {
        let path = StoragePath::from(key);
        let size = data.len();

        let put_result = self.store.put(&path, data.into()).await?;

        tracing::info!(key, size, "Stored media contents");

        Ok(StoredObject {
            key: key.to_string(),
            etag: put_result.e_tag.clone(),
            size,
        })
    }

    /// Read a media payload back
    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = StoragePath::from(key);

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = result.bytes().await?;

        tracing::debug!(key, size = bytes.len(), "Read media contents");

        Ok(bytes.to_vec())
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let path = StoragePath::from(key);

        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored payload
    pub async fn delete(&self, key: &str) -> Result<()> {
        let path = StoragePath::from(key);

        match self.store.delete(&path).await {
            Ok(()) => {
                tracing::info!(key, "Deleted media contents");
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
