/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Category url meaning "every category" in by-category listings
pub const ALL_CATEGORIES_URL: &str = "all-industries";

/// Token in submitted image names that is replaced with the new report id
pub const IMAGE_NAME_PLACEHOLDER: &str = "XXX";

/// Longest side, in pixels, of an uploaded image after thumbnailing
pub const THUMBNAIL_MAX_DIMENSION: u32 = 800;

/// Maximum accepted upload size in bytes (10MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Key prefix for uploaded images in the image store
pub const IMAGE_KEY_PREFIX: &str = "images";
