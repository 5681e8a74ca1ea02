use chrono::{DateTime, Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for url slugs of categories, reports and press releases
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "widget-market", "analytics", "5g-chipset-market"
    /// - Invalid: "-market", "market-", "Widget-Market", "widget market"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Date layouts accepted for `created_date`
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

/// Width of the `created_date` columns
const CATALOG_DATE_MAX_LEN: usize = 32;

/// Years Postgres can cast to `timestamp` and order by
const CATALOG_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Parse a catalog `created_date` string.
///
/// Accepts `YYYY/MM/DD`, `YYYY-MM-DD` and RFC 3339 timestamps that fit the
/// column, with a year between 1 and 9999.
pub fn parse_catalog_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() > CATALOG_DATE_MAX_LEN {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .filter(|date| CATALOG_YEARS.contains(&date.year()))
}

pub fn validate_catalog_date(value: &str) -> Result<(), ValidationError> {
    if parse_catalog_date(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("created_date");
        err.message = Some("created_date must be YYYY/MM/DD, YYYY-MM-DD or RFC 3339, years 1 to 9999".into());
        Err(err)
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
