use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::report_images::models::ReportImage;
use crate::shared::validation::validate_not_blank;

/// Response DTO for report image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportImageResponseDto {
    pub id: i32,
    pub report_id: Option<i32>,
    pub img_name: String,
    pub img_file: String,
}

impl From<ReportImage> for ReportImageResponseDto {
    fn from(i: ReportImage) -> Self {
        Self {
            id: i.id,
            report_id: i.report_id,
            img_name: i.img_name,
            img_file: i.img_file,
        }
    }
}

/// Image submitted together with a new report.
///
/// `XXX` in `img_name` is replaced by the id of the created report.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReportImageInput {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 512, message = "img_name must be at most 512 characters")
    )]
    pub img_name: String,
    /// Base64 payload or stored path
    #[validate(length(min = 1, message = "img_file is required"))]
    pub img_file: String,
}

/// Request DTO for inserting or replacing an image by name
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertReportImageDto {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 512, message = "img_name must be at most 512 characters")
    )]
    pub img_name: String,
    #[validate(length(min = 1, message = "img_file is required"))]
    pub img_file: String,
    /// Owning report; must exist when given
    pub report_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_requires_name_and_file() {
        let input = ReportImageInput {
            img_name: "RPXXX-1".to_string(),
            img_file: "aGVsbG8=".to_string(),
        };
        assert!(input.validate().is_ok());

        let blank = ReportImageInput {
            img_name: "  ".to_string(),
            ..input.clone()
        };
        assert!(blank.validate().is_err());

        let empty_file = ReportImageInput {
            img_file: String::new(),
            ..input
        };
        assert!(empty_file.validate().is_err());
    }
}
