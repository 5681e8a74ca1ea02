use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::press_releases::models::{
    LatestPressReleaseRow, PressRelease, PressReleaseDetailRow, PressReleaseListRow,
    PressReleaseMetaRow,
};
use crate::shared::validation::{validate_catalog_date, validate_not_blank};

/// Every stored field of a press release. Used for create and full-replace update.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PressReleasePayloadDto {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 512, message = "url must be at most 512 characters")
    )]
    pub url: String,
    #[validate(range(min = 1, message = "category_id must be a positive id"))]
    pub category_id: i32,
    #[validate(range(min = 1, message = "report_id must be a positive id"))]
    pub report_id: i32,
    pub summary: String,
    pub description: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub cover_img: String,
    /// `YYYY/MM/DD`, `YYYY-MM-DD` or RFC 3339
    #[validate(custom(function = "validate_catalog_date"))]
    pub created_date: String,
}

/// Response DTO for press release
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PressReleaseResponseDto {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub category_id: i32,
    pub report_id: i32,
    pub summary: String,
    pub description: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub cover_img: String,
    pub created_date: String,
}

impl From<PressRelease> for PressReleaseResponseDto {
    fn from(p: PressRelease) -> Self {
        Self {
            id: p.id,
            title: p.title,
            url: p.url,
            category_id: p.category_id,
            report_id: p.report_id,
            summary: p.summary,
            description: p.description,
            meta_title: p.meta_title,
            meta_desc: p.meta_desc,
            meta_keyword: p.meta_keyword,
            cover_img: p.cover_img,
            created_date: p.created_date,
        }
    }
}

/// Press release as shown in listings and search results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PressReleaseListItemDto {
    pub id: i32,
    pub report_id: i32,
    pub title: String,
    pub category_id: i32,
    pub category_url: String,
    pub category_name: String,
    pub category_abr: String,
    pub summary: String,
    pub created_date: String,
    pub url: String,
    pub cover_img: String,
}

impl From<PressReleaseListRow> for PressReleaseListItemDto {
    fn from(p: PressReleaseListRow) -> Self {
        Self {
            id: p.id,
            report_id: p.report_id,
            title: p.title,
            category_id: p.category_id,
            category_url: p.category_url,
            category_name: p.category_name,
            category_abr: p.category_abr,
            summary: p.summary,
            created_date: p.created_date,
            url: p.url,
            cover_img: p.cover_img,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PressReleaseDetailDto {
    pub id: i32,
    pub report_id: i32,
    pub title: String,
    pub description: String,
    pub category_id: i32,
    pub category_url: String,
    pub category_name: String,
    pub category_abr: String,
    pub summary: String,
    pub created_date: String,
    pub url: String,
    pub cover_img: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
}

impl From<PressReleaseDetailRow> for PressReleaseDetailDto {
    fn from(p: PressReleaseDetailRow) -> Self {
        Self {
            id: p.id,
            report_id: p.report_id,
            title: p.title,
            description: p.description,
            category_id: p.category_id,
            category_url: p.category_url,
            category_name: p.category_name,
            category_abr: p.category_abr,
            summary: p.summary,
            created_date: p.created_date,
            url: p.url,
            cover_img: p.cover_img,
            meta_title: p.meta_title,
            meta_desc: p.meta_desc,
            meta_keyword: p.meta_keyword,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PressReleaseMetaDto {
    pub url: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub summary: String,
}

impl From<PressReleaseMetaRow> for PressReleaseMetaDto {
    fn from(p: PressReleaseMetaRow) -> Self {
        Self {
            url: p.url,
            meta_title: p.meta_title,
            meta_desc: p.meta_desc,
            meta_keyword: p.meta_keyword,
            summary: p.summary,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LatestPressReleaseDto {
    pub summary: String,
    pub created_date: String,
    pub url: String,
    pub cover_img: String,
}

impl From<LatestPressReleaseRow> for LatestPressReleaseDto {
    fn from(p: LatestPressReleaseRow) -> Self {
        Self {
            summary: p.summary,
            created_date: p.created_date,
            url: p.url,
            cover_img: p.cover_img,
        }
    }
}
