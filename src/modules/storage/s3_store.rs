//! S3-compatible image storage
//!
//! Works against MinIO or any S3-compatible service using the rust-s3 crate.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, info};

use super::{ImageStore, StoredObject};
use crate::core::config::S3Config;
use crate::core::error::AppError;

/// Image store backed by a single S3 bucket
pub struct S3ImageStore {
    bucket: Box<Bucket>,
    public_endpoint: String,
}

impl S3ImageStore {
    /// Create a client for the configured bucket.
    ///
    /// The bucket itself is expected to exist and allow public reads on
    /// the image prefix.
    pub fn new(config: S3Config) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Failed to create S3 credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| AppError::Storage(format!("Failed to open S3 bucket: {}", e)))?;

        // Path-style URLs (http://endpoint/bucket/key) for MinIO compatibility
        bucket.set_path_style();

        info!(
            "S3 image store ready: endpoint={}, bucket={}",
            config.endpoint, config.bucket
        );

        Ok(Self {
            bucket,
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Check whether an object is already stored under `key`
    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        match self.bucket.head_object(key).await {
            Ok((_, status)) => Ok((200..300).contains(&status)),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("404") || error_str.contains("NoSuchKey") {
                    Ok(false)
                } else {
                    Err(AppError::Storage(format!(
                        "Failed to check if '{}' exists: {}",
                        key, e
                    )))
                }
            }
        }
    }

    /// Public URL for an object key
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        // S3 has no create-only put; a concurrent writer between the check and
        // the upload can still win
        if self.exists(key).await? {
            return Err(AppError::Conflict(format!("Image '{}' already exists", key)));
        }

        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Storage(format!(
                "Upload of '{}' rejected with status {}",
                key,
                response.status_code()
            )));
        }

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());

        Ok(StoredObject {
            key: key.to_string(),
            url: self.object_url(key),
        })
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
