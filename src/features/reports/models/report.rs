use sqlx::FromRow;

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
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

/// Listing row joined with its category
#[derive(Debug, Clone, FromRow)]
pub struct ReportListRow {
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

/// Full report joined with its category, as shown on the report page
#[derive(Debug, Clone, FromRow)]
pub struct ReportDetailRow {
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

#[derive(Debug, Clone, FromRow)]
pub struct ReportMetaRow {
    pub url: String,
    pub meta_title: String,
    pub meta_desc: String,
    pub meta_keyword: String,
    pub summary: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct LatestReportRow {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub cover_img: String,
}
