//! Storage module for uploaded report images
//!
//! `ImageStore` is the seam the upload service writes through. The backend is
//! picked from configuration at startup: a local directory or an S3-compatible
//! bucket.

mod local_store;
mod s3_store;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::{StorageBackend, StorageConfig};
use crate::core::error::AppError;

pub use local_store::LocalImageStore;
pub use s3_store::S3ImageStore;

/// Result of a successful `put`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key within the store, e.g. "images/20240309101500.png"
    pub key: String,
    /// URL the object can be fetched from
    pub url: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `data` under `key`.
    ///
    /// An object already stored under `key` is left untouched and
    /// `AppError::Conflict` is returned.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<StoredObject, AppError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Build the configured image store
pub async fn build_image_store(config: &StorageConfig) -> Result<Arc<dyn ImageStore>, AppError> {
    match config.backend {
        StorageBackend::Local => Ok(Arc::new(LocalImageStore::new(config.local.clone()).await?)),
        StorageBackend::S3 => Ok(Arc::new(S3ImageStore::new(config.s3.clone())?)),
    }
}
