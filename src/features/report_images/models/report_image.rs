use sqlx::FromRow;

/// Database model for report image
#[derive(Debug, Clone, FromRow)]
pub struct ReportImage {
    pub id: i32,
    pub report_id: Option<i32>,
    pub img_name: String,
    pub img_file: String,
}
