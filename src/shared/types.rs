use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::validation::validate_not_blank;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Pagination query parameters shared by every paginated listing.
///
/// Out-of-range values are rejected rather than clamped.
#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1_000_000, message = "page must be between 1 and 1000000"))]
    #[param(minimum = 1, maximum = 1_000_000)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100)]
    pub per_page: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page }
    }

    /// SQL OFFSET for the requested page; only meaningful after validation
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Keyword search over titles with pagination and an optional category filter
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct SearchQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1_000_000, message = "page must be between 1 and 1000000"))]
    #[param(minimum = 1, maximum = 1_000_000)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100)]
    pub per_page: i64,

    /// Matched against titles by full-text search or case-insensitive substring
    #[validate(custom(function = "validate_not_blank"))]
    pub keyword: String,

    /// Restrict results to a single category
    pub category_id: Option<i32>,
}

impl SearchQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_page_offset() {
        let page = PaginationQuery::new(2, 10);
        assert_eq!(page.offset(), 10);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_first_page_starts_at_zero() {
        assert_eq!(PaginationQuery::default().offset(), 0);
    }

    #[test]
    fn test_page_zero_is_rejected() {
        assert!(PaginationQuery::new(0, 10).validate().is_err());
        assert!(PaginationQuery::new(-3, 10).validate().is_err());
        assert!(PaginationQuery::new(1, 10).validate().is_ok());
    }

    #[test]
    fn test_huge_page_is_rejected() {
        assert!(PaginationQuery::new(i64::MAX, 100).validate().is_err());
        assert!(PaginationQuery::new(1_000_001, 10).validate().is_err());
        assert!(PaginationQuery::new(1_000_000, 100).validate().is_ok());
        assert_eq!(PaginationQuery::new(1_000_000, 100).offset(), 99_999_900);
        assert_eq!(PaginationQuery::new(i64::MAX, 100).offset(), i64::MAX);
    }

    #[test]
    fn test_per_page_bounds() {
        assert!(PaginationQuery::new(1, 0).validate().is_err());
        assert!(PaginationQuery::new(1, 101).validate().is_err());
        assert!(PaginationQuery::new(1, 100).validate().is_ok());
    }

    #[test]
    fn test_search_query_requires_keyword() {
        let query = SearchQuery {
            page: 1,
            per_page: 10,
            keyword: "   ".to_string(),
            category_id: None,
        };
        assert!(query.validate().is_err());

        let query = SearchQuery {
            keyword: "battery".to_string(),
            ..query
        };
        assert!(query.validate().is_ok());
        assert_eq!(query.pagination().offset(), 0);
    }

    #[test]
    fn test_envelope_serialization() {
        let response = ApiResponse::success(Some(vec![1, 2]), None, Some(Meta { total: 2 }));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["meta"]["total"], 2);
        assert!(json["errors"].is_null());
    }
}
