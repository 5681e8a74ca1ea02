use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryCount};
use crate::shared::validation::SLUG_REGEX;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i32,
    pub abr: String,
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub back_cover: Option<String>,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_keyword: Option<String>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            abr: c.abr,
            name: c.name,
            url: c.url,
            icon: c.icon,
            back_cover: c.back_cover,
            meta_title: c.meta_title,
            meta_desc: c.meta_desc,
            meta_keyword: c.meta_keyword,
        }
    }
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 16, message = "abr must be 1-16 characters"))]
    pub abr: String,
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(regex(path = *SLUG_REGEX, message = "url must be a lowercase hyphenated slug"))]
    pub url: String,
    pub icon: Option<String>,
    pub back_cover: Option<String>,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_keyword: Option<String>,
}

/// Per-category row count, as returned by the `category_count` endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountDto {
    pub category_id: i32,
    pub category_url: String,
    pub category_abr: String,
    pub category_name: String,
    pub category_back_cover: Option<String>,
    pub category_icon: Option<String>,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountDto {
    fn from(c: CategoryCount) -> Self {
        Self {
            category_id: c.category_id,
            category_url: c.category_url,
            category_abr: c.category_abr,
            category_name: c.category_name,
            category_back_cover: c.category_back_cover,
            category_icon: c.category_icon,
            count: c.count,
        }
    }
}
