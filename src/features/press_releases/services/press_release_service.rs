use sqlx::PgPool;

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::categories::dtos::CategoryCountDto;
use crate::features::categories::models::CategoryCount;
use crate::features::press_releases::dtos::{
    LatestPressReleaseDto, PressReleaseDetailDto, PressReleaseListItemDto, PressReleaseMetaDto,
    PressReleasePayloadDto, PressReleaseResponseDto,
};
use crate::features::press_releases::models::{
    LatestPressReleaseRow, PressRelease, PressReleaseDetailRow, PressReleaseListRow,
    PressReleaseMetaRow,
};
use crate::shared::constants::ALL_CATEGORIES_URL;
use crate::shared::query::{contains_pattern, newest_first, title_match};
use crate::shared::types::{PaginationQuery, SearchQuery};

const PRESS_RELEASE_COLUMNS: &str = "id, title, url, category_id, report_id, summary, description, \
     meta_title, meta_desc, meta_keyword, cover_img, created_date";

const LIST_COLUMNS: &str = "p.id, p.report_id, p.title, p.category_id, c.url AS category_url, \
     c.name AS category_name, c.abr AS category_abr, p.summary, p.created_date, p.url, p.cover_img";

/// Service for press release queries and writes
pub struct PressReleaseService {
    pool: PgPool,
}

impl PressReleaseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<PressReleaseListItemDto>> {
        let rows: Vec<PressReleaseListRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM press_releases p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.id DESC
            "#,
            LIST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list press releases: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Keyword search over titles, optionally within one category
    pub async fn search(&self, query: &SearchQuery) -> Result<(Vec<PressReleaseListItemDto>, i64)> {
        let page = query.pagination();
        let keyword = query.keyword.trim();
        let pattern = contains_pattern(keyword);
        let filter = format!(
            "{} AND ($3::int IS NULL OR p.category_id = $3)",
            title_match("p")
        );

        let rows: Vec<PressReleaseListRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM press_releases p
            JOIN categories c ON c.id = p.category_id
            WHERE {}
            ORDER BY {}
            LIMIT $4 OFFSET $5
            "#,
            LIST_COLUMNS,
            filter,
            newest_first("p")
        ))
        .bind(keyword)
        .bind(&pattern)
        .bind(query.category_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search press releases: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM press_releases p WHERE {}",
            filter
        ))
        .bind(keyword)
        .bind(&pattern)
        .bind(query.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.into_iter().map(|r| r.into()).collect(), total))
    }

    /// Number of press releases per category; empty categories are left out
    pub async fn category_counts(&self) -> Result<Vec<CategoryCountDto>> {
        let rows: Vec<CategoryCount> = sqlx::query_as(
            r#"
            SELECT c.id AS category_id, c.url AS category_url, c.abr AS category_abr,
                   c.name AS category_name, c.back_cover AS category_back_cover,
                   c.icon AS category_icon, COUNT(p.id) AS count
            FROM categories c
            JOIN press_releases p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count press releases per category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn latest(
        &self,
        page: &PaginationQuery,
    ) -> Result<(Vec<LatestPressReleaseDto>, i64)> {
        let rows: Vec<LatestPressReleaseRow> = sqlx::query_as(&format!(
            r#"
            SELECT p.summary, p.created_date, p.url, p.cover_img
            FROM press_releases p
            ORDER BY {}
            LIMIT $1 OFFSET $2
            "#,
            newest_first("p")
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list latest press releases: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM press_releases")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(|r| r.into()).collect(), total))
    }

    /// Press releases of one category, newest first. `all-industries` lists every category.
    pub async fn list_by_category(
        &self,
        category_url: &str,
        page: &PaginationQuery,
    ) -> Result<(Vec<PressReleaseListItemDto>, i64)> {
        let category_filter = if category_url == ALL_CATEGORIES_URL {
            None
        } else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE url = $1)")
                    .bind(category_url)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                return Err(AppError::NotFound(format!(
                    "Category '{}' not found",
                    category_url
                )));
            }
            Some(category_url)
        };

        let rows: Vec<PressReleaseListRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM press_releases p
            JOIN categories c ON c.id = p.category_id
            WHERE ($1::text IS NULL OR c.url = $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            LIST_COLUMNS,
            newest_first("p")
        ))
        .bind(category_filter)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list press releases by category: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM press_releases p
            JOIN categories c ON c.id = p.category_id
            WHERE ($1::text IS NULL OR c.url = $1)
            "#,
        )
        .bind(category_filter)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.into_iter().map(|r| r.into()).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<PressReleaseResponseDto> {
        let press_release: Option<PressRelease> = sqlx::query_as(&format!(
            "SELECT {} FROM press_releases WHERE id = $1",
            PRESS_RELEASE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get press release by id: {:?}", e);
            AppError::Database(e)
        })?;

        press_release
            .map(|p| p.into())
            .ok_or_else(|| AppError::NotFound(format!("Press release {} not found", id)))
    }

    pub async fn get_by_url(&self, url: &str) -> Result<PressReleaseDetailDto> {
        let row: Option<PressReleaseDetailRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.report_id, p.title, p.description, p.category_id,
                   c.url AS category_url, c.name AS category_name, c.abr AS category_abr,
                   p.summary, p.created_date, p.url, p.cover_img,
                   p.meta_title, p.meta_desc, p.meta_keyword
            FROM press_releases p
            JOIN categories c ON c.id = p.category_id
            WHERE p.url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get press release by url: {:?}", e);
            AppError::Database(e)
        })?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Press release '{}' not found", url)))
    }

    pub async fn get_meta(&self, url: &str) -> Result<PressReleaseMetaDto> {
        let row: Option<PressReleaseMetaRow> = sqlx::query_as(
            "SELECT url, meta_title, meta_desc, meta_keyword, summary FROM press_releases WHERE url = $1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Press release '{}' not found", url)))
    }

    pub async fn create(&self, dto: &PressReleasePayloadDto) -> Result<PressReleaseResponseDto> {
        let press_release: PressRelease = sqlx::query_as(&format!(
            r#"
            INSERT INTO press_releases (title, url, category_id, report_id, summary, description,
                                        meta_title, meta_desc, meta_keyword, cover_img, created_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PRESS_RELEASE_COLUMNS
        ))
        .bind(dto.title.trim())
        .bind(dto.url.trim())
        .bind(dto.category_id)
        .bind(dto.report_id)
        .bind(&dto.summary)
        .bind(&dto.description)
        .bind(&dto.meta_title)
        .bind(&dto.meta_desc)
        .bind(&dto.meta_keyword)
        .bind(&dto.cover_img)
        .bind(dto.created_date.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Press release"))?;

        tracing::info!(
            "Created press release {} ({})",
            press_release.id,
            press_release.url
        );
        Ok(press_release.into())
    }

    /// Replace every field of an existing press release
    pub async fn update(
        &self,
        id: i32,
        dto: &PressReleasePayloadDto,
    ) -> Result<PressReleaseResponseDto> {
        let press_release: Option<PressRelease> = sqlx::query_as(&format!(
            r#"
            UPDATE press_releases
            SET title = $2, url = $3, category_id = $4, report_id = $5, summary = $6,
                description = $7, meta_title = $8, meta_desc = $9, meta_keyword = $10,
                cover_img = $11, created_date = $12
            WHERE id = $1
            RETURNING {}
            "#,
            PRESS_RELEASE_COLUMNS
        ))
        .bind(id)
        .bind(dto.title.trim())
        .bind(dto.url.trim())
        .bind(dto.category_id)
        .bind(dto.report_id)
        .bind(&dto.summary)
        .bind(&dto.description)
        .bind(&dto.meta_title)
        .bind(&dto.meta_desc)
        .bind(&dto.meta_keyword)
        .bind(&dto.cover_img)
        .bind(dto.created_date.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Press release"))?;

        let press_release = press_release
            .ok_or_else(|| AppError::NotFound(format!("Press release {} not found", id)))?;

        tracing::info!(
            "Updated press release {} ({})",
            press_release.id,
            press_release.url
        );
        Ok(press_release.into())
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM press_releases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error("Press release"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Press release {} not found",
                id
            )));
        }

        tracing::info!("Deleted press release {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str, url: &str, category_id: i32, created_date: &str) -> PressReleasePayloadDto {
        PressReleasePayloadDto {
            title: title.to_string(),
            url: url.to_string(),
            category_id,
            report_id: 1,
            summary: format!("{} summary", title),
            description: String::new(),
            meta_title: String::new(),
            meta_desc: String::new(),
            meta_keyword: String::new(),
            cover_img: String::new(),
            created_date: created_date.to_string(),
        }
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_by_category_pages_newest_first(pool: PgPool) {
        let service = PressReleaseService::new(pool);
        for day in 1..=25 {
            service
                .create(&payload(
                    &format!("Release {}", day),
                    &format!("release-{}", day),
                    if day % 5 == 0 { 5 } else { 1 },
                    &format!("2024/01/{:02}", day),
                ))
                .await
                .unwrap();
        }

        let (page, total) = service
            .list_by_category("all-industries", &PaginationQuery::new(2, 10))
            .await
            .unwrap();
        assert_eq!(total, 25);
        let urls: Vec<String> = page.into_iter().map(|p| p.url).collect();
        let expected: Vec<String> = (6..=15).rev().map(|d| format!("release-{}", d)).collect();
        assert_eq!(urls, expected);

        let (services, total) = service
            .list_by_category("services", &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert!(services.iter().all(|p| p.category_url == "services"));

        let counts = service.category_counts().await.unwrap();
        assert_eq!(counts.iter().map(|c| c.count).sum::<i64>(), 25);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_search_honours_category_filter(pool: PgPool) {
        let service = PressReleaseService::new(pool);
        service
            .create(&payload("Widget Market Expands", "widget-expands", 1, "2024/01/01"))
            .await
            .unwrap();
        service
            .create(&payload("Widgets For Services", "widget-services", 5, "2024/02/01"))
            .await
            .unwrap();

        let query = |category_id| SearchQuery {
            page: 1,
            per_page: 10,
            keyword: "WIDGET".to_string(),
            category_id,
        };

        let (all, total) = service.search(&query(None)).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all[0].url, "widget-services");

        let (filtered, total) = service.search(&query(Some(1))).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(filtered[0].url, "widget-expands");
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_update_and_not_found(pool: PgPool) {
        let service = PressReleaseService::new(pool);
        let created = service
            .create(&payload("Widget Release", "widget-release", 1, "2024/01/01"))
            .await
            .unwrap();

        let updated = service
            .update(created.id, &payload("Gadget Release", "gadget-release", 5, "2024/03/01"))
            .await
            .unwrap();
        assert_eq!(updated.url, "gadget-release");
        assert_eq!(service.get_meta("gadget-release").await.unwrap().url, "gadget-release");

        assert!(matches!(service.get_by_url("widget-release").await, Err(AppError::NotFound(_))));
        assert!(matches!(service.get_by_id(9999).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(9999, &payload("X", "x", 1, "2024/01/01")).await,
            Err(AppError::NotFound(_))
        ));

        service.delete(created.id).await.unwrap();
        assert!(matches!(service.delete(created.id).await, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_duplicate_url_is_conflict(pool: PgPool) {
        let service = PressReleaseService::new(pool);
        let release = payload("Widget Release", "widget-release", 1, "2024/01/01");

        service.create(&release).await.unwrap();
        assert!(matches!(service.create(&release).await, Err(AppError::Conflict(_))));
    }
}
