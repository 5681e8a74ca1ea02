//! Local filesystem image storage
//!
//! Objects are written below a root directory which the HTTP server exposes
//! under `/static`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{ImageStore, StoredObject};
use crate::core::config::LocalStorageConfig;
use crate::core::error::AppError;

pub struct LocalImageStore {
    root_dir: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    /// Create the store, making sure the root directory exists
    pub async fn new(config: LocalStorageConfig) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&config.root_dir)
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create image directory '{}': {}",
                    config.root_dir.display(),
                    e
                ))
            })?;

        Ok(Self {
            root_dir: config.root_dir,
            public_base_url: config.public_base_url,
        })
    }

    /// Resolve a key to a path under the root, refusing anything that escapes it
    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(AppError::BadRequest(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.root_dir.join(relative))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, AppError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create '{}': {}", parent.display(), e)))?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(AppError::Conflict(format!("Image '{}' already exists", key)));
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to create '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        file.write_all(&data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write '{}': {}", path.display(), e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write '{}': {}", path.display(), e)))?;

        debug!("Stored image at {}", path.display());

        Ok(StoredObject {
            key: key.to_string(),
            url: format!("{}/{}", self.public_base_url, key),
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_in(dir: &Path) -> LocalImageStore {
        LocalImageStore::new(LocalStorageConfig {
            root_dir: dir.join("uploads"),
            public_base_url: "http://localhost:3000/static".to_string(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;

        let stored = store
            .put("images/20240309101500.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(
            stored.url,
            "http://localhost:3000/static/images/20240309101500.png"
        );
        let written = tokio::fs::read(dir.path().join("uploads/images/20240309101500.png"))
            .await
            .unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_put_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;

        store
            .put("images/20240309101500.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        let err = store
            .put("images/20240309101500.png", vec![9, 9], "image/png")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let kept = tokio::fs::read(dir.path().join("uploads/images/20240309101500.png"))
            .await
            .unwrap();
        assert_eq!(kept, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path()).await;

        for key in ["../etc/passwd", "/abs.png", "images/../../x.png", ""] {
            let err = store.put(key, vec![0], "image/png").await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "key {:?}", key);
        }
    }
}
