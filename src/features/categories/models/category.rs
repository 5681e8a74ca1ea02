use sqlx::FromRow;

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
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

/// A category together with how many rows of some entity reference it
#[derive(Debug, Clone, FromRow)]
pub struct CategoryCount {
    pub category_id: i32,
    pub category_url: String,
    pub category_abr: String,
    pub category_name: String,
    pub category_back_cover: Option<String>,
    pub category_icon: Option<String>,
    pub count: i64,
}
