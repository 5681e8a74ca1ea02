use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::UploadImageResponseDto;
use crate::modules::storage::{ImageStore, StoredObject};
use crate::shared::constants::{IMAGE_KEY_PREFIX, THUMBNAIL_MAX_DIMENSION};

/// Uploads sharing a timestamp before the request is refused
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Shrinks uploaded images and writes them to the image store
pub struct ImageUploadService {
    store: Arc<dyn ImageStore>,
}

/// Re-encoded image ready for storage
struct Thumbnail {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageUploadService {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// Thumbnail `data` and store it as `images/{timestamp}.{ext}`.
    ///
    /// The extension of `filename` picks the output format.
    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<UploadImageResponseDto> {
        let extension = file_extension(filename).ok_or_else(|| {
            AppError::BadRequest(format!("File '{}' has no extension", filename))
        })?;
        let format = ImageFormat::from_extension(&extension).ok_or_else(|| {
            AppError::BadRequest(format!("Unsupported image type '.{}'", extension))
        })?;

        let thumbnail = tokio::task::spawn_blocking(move || shrink_image(&data, format))
            .await
            .map_err(|e| AppError::Internal(format!("Image resize task failed: {}", e)))??;

        let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
        let stored = self
            .store_unique(&stamp, &extension, thumbnail.bytes, format.to_mime_type())
            .await?;

        tracing::info!(
            "Uploaded {} as {} ({}x{}) to {} store",
            filename,
            stored.key,
            thumbnail.width,
            thumbnail.height,
            self.store.backend_name()
        );

        Ok(UploadImageResponseDto {
            key: stored.key,
            url: stored.url,
            width: thumbnail.width,
            height: thumbnail.height,
        })
    }

    /// Store under `images/{stamp}.{ext}`, or `images/{stamp}-{n}.{ext}` when
    /// earlier uploads in the same second took the plain name
    async fn store_unique(
        &self,
        stamp: &str,
        extension: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let key = upload_key(stamp, attempt, extension);
            match self.store.put(&key, bytes.clone(), content_type).await {
                Err(AppError::Conflict(_)) => {
                    tracing::debug!("Image key {} taken, trying next suffix", key);
                }
                result => return result,
            }
        }

        Err(AppError::Conflict(format!(
            "Too many uploads at {}, try again",
            stamp
        )))
    }
}

fn upload_key(stamp: &str, attempt: u32, extension: &str) -> String {
    if attempt == 0 {
        format!("{}/{}.{}", IMAGE_KEY_PREFIX, stamp, extension)
    } else {
        format!("{}/{}-{}.{}", IMAGE_KEY_PREFIX, stamp, attempt, extension)
    }
}

fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| !e.is_empty())
}

/// Decode, fit inside the thumbnail box keeping aspect ratio, and re-encode.
/// Images already inside the box keep their size.
fn shrink_image(data: &[u8], format: ImageFormat) -> Result<Thumbnail> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| AppError::BadRequest(format!("Unable to decode image: {}", e)))?;

    let (width, height) = decoded.dimensions();
    let resized = if width > THUMBNAIL_MAX_DIMENSION || height > THUMBNAIL_MAX_DIMENSION {
        decoded.thumbnail(THUMBNAIL_MAX_DIMENSION, THUMBNAIL_MAX_DIMENSION)
    } else {
        decoded
    };

    // JPEG has no alpha channel
    let output = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => resized,
    };

    let mut bytes = Vec::new();
    output
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| AppError::BadRequest(format!("Unable to encode image: {}", e)))?;

    Ok(Thumbnail {
        bytes,
        width: output.width(),
        height: output.height(),
    })
}
