use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::prices::dtos::PriceResponseDto;
use crate::features::report_images::dtos::{ReportImageInput, ReportImageResponseDto};
use crate::features::reports::models::{
    LatestReportRow, Report, ReportDetailRow, ReportListRow, ReportMetaRow,
};
use crate::shared::validation::{validate_catalog_date, validate_not_blank};

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Every stored field of a report. Used for create and for full-replace update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReportPayloadDto {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 512, message = "url must be at most 512 characters")
    )]
    pub url: String,
    #[validate(range(min = 1, message = "category_id must be a positive id"))]
    pub category_id: i32,
    pub summary: String,
    pub description: String,
    pub toc: String,
    pub highlights: String,
    pub faqs: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    #[validate(length(max = 32, message = "pages must be at most 32 characters"))]
    pub pages: String,
    pub cover_img: String,
    /// `YYYY/MM/DD`, `YYYY-MM-DD` or RFC 3339
    #[validate(custom(function = "validate_catalog_date"))]
    pub created_date: String,
}

/// A report and the images to attach to it
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportWithImagesDto {
    #[validate(nested)]
    pub report: ReportPayloadDto,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<ReportImageInput>,
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub category_id: i32,
    pub summary: String,
    pub description: String,
    pub toc: String,
    pub highlights: String,
    pub faqs: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub pages: String,
    pub cover_img: String,
    pub created_date: String,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            title: r.title,
            url: r.url,
            category_id: r.category_id,
            summary: r.summary,
            description: r.description,
            toc: r.toc,
            highlights: r.highlights,
            faqs: r.faqs,
            meta_title: r.meta_title,
            meta_desc: r.meta_desc,
            meta_keyword: r.meta_keyword,
            pages: r.pages,
            cover_img: r.cover_img,
            created_date: r.created_date,
        }
    }
}

/// Report as shown in listings and search results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportListItemDto {
    pub id: i32,
    pub url: String,
    pub category_id: i32,
    pub category_name: String,
    pub category_url: String,
    pub title: String,
    pub summary: String,
    pub pages: String,
    pub cover_img: String,
    pub created_date: String,
}

impl From<ReportListRow> for ReportListItemDto {
    fn from(r: ReportListRow) -> Self {
        Self {
            id: r.id,
            url: r.url,
            category_id: r.category_id,
            category_name: r.category_name,
            category_url: r.category_url,
            title: r.title,
            summary: r.summary,
            pages: r.pages,
            cover_img: r.cover_img,
            created_date: r.created_date,
        }
    }
}

/// Full report with its category name, url and abbreviation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailDto {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub category_id: i32,
    pub category_name: String,
    pub category_url: String,
    pub category_abr: String,
    pub summary: String,
    pub description: String,
    pub toc: String,
    pub highlights: String,
    pub faqs: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub pages: String,
    pub cover_img: String,
    pub created_date: String,
}

impl From<ReportDetailRow> for ReportDetailDto {
    fn from(r: ReportDetailRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            url: r.url,
            category_id: r.category_id,
            category_name: r.category_name,
            category_url: r.category_url,
            category_abr: r.category_abr,
            summary: r.summary,
            description: r.description,
            toc: r.toc,
            highlights: r.highlights,
            faqs: r.faqs,
            meta_title: r.meta_title,
            meta_desc: r.meta_desc,
            meta_keyword: r.meta_keyword,
            pages: r.pages,
            cover_img: r.cover_img,
            created_date: r.created_date,
        }
    }
}

/// SEO metadata of a report page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportMetaDto {
    pub url: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub summary: String,
}

impl From<ReportMetaRow> for ReportMetaDto {
    fn from(r: ReportMetaRow) -> Self {
        Self {
            url: r.url,
            meta_title: r.meta_title,
            meta_desc: r.meta_desc,
            meta_keyword: r.meta_keyword,
            summary: r.summary,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LatestReportDto {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub cover_img: String,
}

impl From<LatestReportRow> for LatestReportDto {
    fn from(r: LatestReportRow) -> Self {
        Self {
            title: r.title,
            url: r.url,
            summary: r.summary,
            cover_img: r.cover_img,
        }
    }
}

/// A created report together with its stored images
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportWithImagesDto {
    pub report: ReportResponseDto,
    pub images: Vec<ReportImageResponseDto>,
}

/// Everything the report purchase page needs in one response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportBundleDto {
    pub report: ReportResponseDto,
    pub category: CategoryResponseDto,
    pub price_list: Vec<PriceResponseDto>,
    pub images: Vec<ReportImageResponseDto>,
}

/// Multipart form with a single `file` part.
/// Documentation only; handlers read the body with axum's Multipart extractor.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct FileUploadForm {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Result of an image upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadImageResponseDto {
    /// Key within the image store, e.g. "images/20240309101500.png"
    pub key: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ReportPayloadDto {
        ReportPayloadDto {
            title: "Global Widget Market".to_string(),
            url: "widget-market".to_string(),
            category_id: 1,
            summary: String::new(),
            description: String::new(),
            toc: String::new(),
            highlights: String::new(),
            faqs: String::new(),
            meta_title: String::new(),
            meta_desc: String::new(),
            meta_keyword: String::new(),
            pages: "180".to_string(),
            cover_img: String::new(),
            created_date: "2024/03/09".to_string(),
        }
    }

    #[test]
    fn test_payload_valid() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_payload_requires_title_and_url() {
        let mut p = payload();
        p.title = " ".to_string();
        assert!(p.validate().is_err());

        let mut p = payload();
        p.url.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_payload_rejects_unparseable_date() {
        let mut p = payload();
        p.created_date = "next tuesday".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_nested_images_are_validated() {
        let dto = CreateReportWithImagesDto {
            report: payload(),
            images: vec![ReportImageInput {
                img_name: String::new(),
                img_file: "aGVsbG8=".to_string(),
            }],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_images_default_to_empty() {
        let json = serde_json::json!({ "report": payload() });
        let dto: CreateReportWithImagesDto = serde_json::from_value(json).unwrap();
        assert!(dto.images.is_empty());
    }
}
