use sqlx::FromRow;

/// Database model for press release
#[derive(Debug, Clone, FromRow)]
pub struct PressRelease {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub category_id: i32,
    /// Report the release announces; not enforced by a foreign key
    pub report_id: i32,
    pub summary: String,
    pub description: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub cover_img: String,
    pub created_date: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct PressReleaseListRow {
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

#[derive(Debug, Clone, FromRow)]
pub struct PressReleaseDetailRow {
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

#[derive(Debug, Clone, FromRow)]
pub struct PressReleaseMetaRow {
    pub url: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub summary: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct LatestPressReleaseRow {
    pub summary: String,
    pub created_date: String,
    pub url: String,
    pub cover_img: String,
}
