use sqlx::{PgPool, Postgres, Transaction};

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::categories::dtos::CategoryCountDto;
use crate::features::categories::models::CategoryCount;
use crate::features::report_images::services::ReportImageService;
use crate::features::reports::dtos::{
    CreateReportWithImagesDto, LatestReportDto, ReportDetailDto, ReportListItemDto, ReportMetaDto,
    ReportPayloadDto, ReportResponseDto, ReportWithImagesDto,
};
use crate::features::reports::models::{
    LatestReportRow, Report, ReportDetailRow, ReportListRow, ReportMetaRow,
};
use crate::shared::constants::{ALL_CATEGORIES_URL, IMAGE_NAME_PLACEHOLDER};
use crate::shared::query::{contains_pattern, newest_first, title_match};
use crate::shared::types::{PaginationQuery, SearchQuery};

const REPORT_COLUMNS: &str = "id, title, url, category_id, summary, description, toc, highlights, \
     faqs, meta_title, meta_desc, meta_keyword, pages, cover_img, created_date";

const LIST_COLUMNS: &str = "r.id, r.url, r.category_id, c.name AS category_name, \
     c.url AS category_url, r.title, r.summary, r.pages, r.cover_img, r.created_date";

/// Replace the image name placeholder with the owning report's id
pub fn substitute_report_id(img_name: &str, report_id: i32) -> String {
    img_name.replace(IMAGE_NAME_PLACEHOLDER, &report_id.to_string())
}

/// Service for report queries and writes
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All reports, newest id first, with category name and url
    pub async fn list(&self) -> Result<Vec<ReportListItemDto>> {
        let rows: Vec<ReportListRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            ORDER BY r.id DESC
            "#,
            LIST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Newest reports by `created_date`, with the total report count
    pub async fn latest(&self, page: &PaginationQuery) -> Result<(Vec<LatestReportDto>, i64)> {
        let rows: Vec<LatestReportRow> = sqlx::query_as(&format!(
            r#"
            SELECT r.title, r.url, r.summary, r.cover_img
            FROM reports r
            ORDER BY {}
            LIMIT $1 OFFSET $2
            "#,
            newest_first("r")
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list latest reports: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(|r| r.into()).collect(), total))
    }

    /// Keyword search over titles, optionally within one category
    pub async fn search(&self, query: &SearchQuery) -> Result<(Vec<ReportListItemDto>, i64)> {
        let page = query.pagination();
        let keyword = query.keyword.trim();
        let pattern = contains_pattern(keyword);
        let filter = format!(
            "{} AND ($3::int IS NULL OR r.category_id = $3)",
            title_match("r")
        );

        let rows: Vec<ReportListRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            WHERE {}
            ORDER BY {}
            LIMIT $4 OFFSET $5
            "#,
            LIST_COLUMNS,
            filter,
            newest_first("r")
        ))
        .bind(keyword)
        .bind(&pattern)
        .bind(query.category_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search reports: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM reports r WHERE {}", filter))
                .bind(keyword)
                .bind(&pattern)
                .bind(query.category_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((rows.into_iter().map(|r| r.into()).collect(), total))
    }

    /// Number of reports per category; categories without reports are left out
    pub async fn category_counts(&self) -> Result<Vec<CategoryCountDto>> {
        let rows: Vec<CategoryCount> = sqlx::query_as(
            r#"
            SELECT c.id AS category_id, c.url AS category_url, c.abr AS category_abr,
                   c.name AS category_name, c.back_cover AS category_back_cover,
                   c.icon AS category_icon, COUNT(r.id) AS count
            FROM categories c
            JOIN reports r ON r.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports per category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Reports of one category, newest first. `all-industries` lists every category.
    pub async fn list_by_category(
        &self,
        category_url: &str,
        page: &PaginationQuery,
    ) -> Result<(Vec<ReportListItemDto>, i64)> {
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

        let rows: Vec<ReportListRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            WHERE ($1::text IS NULL OR c.url = $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            LIST_COLUMNS,
            newest_first("r")
        ))
        .bind(category_filter)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports by category: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            WHERE ($1::text IS NULL OR c.url = $1)
            "#,
        )
        .bind(category_filter)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.into_iter().map(|r| r.into()).collect(), total))
    }

    /// Get report by id
    pub async fn get_by_id(&self, id: i32) -> Result<ReportResponseDto> {
        let report: Option<Report> = sqlx::query_as(&format!(
            "SELECT {} FROM reports WHERE id = $1",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report by id: {:?}", e);
            AppError::Database(e)
        })?;

        report
            .map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Get a full report with its category by url
    pub async fn get_by_url(&self, url: &str) -> Result<ReportDetailDto> {
        let row: Option<ReportDetailRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.title, r.url, r.category_id,
                   c.name AS category_name, c.url AS category_url, c.abr AS category_abr,
                   r.summary, r.description, r.toc, r.highlights, r.faqs,
                   r.meta_title, r.meta_desc, r.meta_keyword,
                   r.pages, r.cover_img, r.created_date
            FROM reports r
            JOIN categories c ON c.id = r.category_id
            WHERE r.url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report by url: {:?}", e);
            AppError::Database(e)
        })?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Report '{}' not found", url)))
    }

    /// SEO metadata of a report by url
    pub async fn get_meta(&self, url: &str) -> Result<ReportMetaDto> {
        let row: Option<ReportMetaRow> = sqlx::query_as(
            "SELECT url, meta_title, meta_desc, meta_keyword, summary FROM reports WHERE url = $1",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into())
            .ok_or_else(|| AppError::NotFound(format!("Report '{}' not found", url)))
    }

    /// Create a report and its images in one transaction
    pub async fn create(&self, dto: &CreateReportWithImagesDto) -> Result<ReportWithImagesDto> {
        let mut tx = self.pool.begin().await?;
        let created = Self::insert_with_images(&mut tx, dto).await?;
        tx.commit().await?;

        tracing::info!(
            "Created report {} ({}) with {} images",
            created.report.id,
            created.report.url,
            created.images.len()
        );
        Ok(created)
    }

    /// Create several reports; either all are stored or none
    pub async fn create_bulk(
        &self,
        dtos: &[CreateReportWithImagesDto],
    ) -> Result<Vec<ReportWithImagesDto>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(dtos.len());
        for dto in dtos {
            created.push(Self::insert_with_images(&mut tx, dto).await?);
        }
        tx.commit().await?;

        tracing::info!("Created {} reports", created.len());
        Ok(created)
    }

    async fn insert_with_images(
        tx: &mut Transaction<'_, Postgres>,
        dto: &CreateReportWithImagesDto,
    ) -> Result<ReportWithImagesDto> {
        let report = Self::insert(tx, &dto.report).await?;

        let mut images = Vec::with_capacity(dto.images.len());
        for image in &dto.images {
            let name = substitute_report_id(&image.img_name, report.id);
            let stored =
                ReportImageService::insert_owned(&mut **tx, report.id, &name, &image.img_file)
                    .await?;
            images.push(stored.into());
        }

        Ok(ReportWithImagesDto {
            report: report.into(),
            images,
        })
    }

    async fn insert(tx: &mut Transaction<'_, Postgres>, dto: &ReportPayloadDto) -> Result<Report> {
        sqlx::query_as(&format!(
            r#"
            INSERT INTO reports (title, url, category_id, summary, description, toc, highlights,
                                 faqs, meta_title, meta_desc, meta_keyword, pages, cover_img,
                                 created_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(dto.title.trim())
        .bind(dto.url.trim())
        .bind(dto.category_id)
        .bind(&dto.summary)
        .bind(&dto.description)
        .bind(&dto.toc)
        .bind(&dto.highlights)
        .bind(&dto.faqs)
        .bind(&dto.meta_title)
        .bind(&dto.meta_desc)
        .bind(&dto.meta_keyword)
        .bind(&dto.pages)
        .bind(&dto.cover_img)
        .bind(dto.created_date.trim())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_db_error("Report"))
    }

    /// Replace every field of an existing report
    pub async fn update(&self, id: i32, dto: &ReportPayloadDto) -> Result<ReportResponseDto> {
        let report: Option<Report> = sqlx::query_as(&format!(
            r#"
            UPDATE reports
            SET title = $2, url = $3, category_id = $4, summary = $5, description = $6,
                toc = $7, highlights = $8, faqs = $9, meta_title = $10, meta_desc = $11,
                meta_keyword = $12, pages = $13, cover_img = $14, created_date = $15
            WHERE id = $1
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(id)
        .bind(dto.title.trim())
        .bind(dto.url.trim())
        .bind(dto.category_id)
        .bind(&dto.summary)
        .bind(&dto.description)
        .bind(&dto.toc)
        .bind(&dto.highlights)
        .bind(&dto.faqs)
        .bind(&dto.meta_title)
        .bind(&dto.meta_desc)
        .bind(&dto.meta_keyword)
        .bind(&dto.pages)
        .bind(&dto.cover_img)
        .bind(dto.created_date.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Report"))?;

        let report = report.ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Updated report {} ({})", report.id, report.url);
        Ok(report.into())
    }

    /// Delete a report; its images go with it
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error("Report"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Deleted report {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::report_images::dtos::ReportImageInput;

    #[test]
    fn test_substitute_report_id() {
        assert_eq!(substitute_report_id("RPXXX-cover", 42), "RP42-cover");
        assert_eq!(substitute_report_id("XXX_XXX", 7), "7_7");
        assert_eq!(substitute_report_id("banner", 7), "banner");
    }

    fn payload(title: &str, url: &str, category_id: i32, created_date: &str) -> ReportPayloadDto {
        ReportPayloadDto {
            title: title.to_string(),
            url: url.to_string(),
            category_id,
            summary: format!("{} summary", title),
            description: String::new(),
            toc: String::new(),
            highlights: String::new(),
            faqs: String::new(),
            meta_title: String::new(),
            meta_desc: String::new(),
            meta_keyword: String::new(),
            pages: "120".to_string(),
            cover_img: String::new(),
            created_date: created_date.to_string(),
        }
    }

    fn without_images(report: ReportPayloadDto) -> CreateReportWithImagesDto {
        CreateReportWithImagesDto {
            report,
            images: Vec::new(),
        }
    }

    fn search(keyword: &str, category_id: Option<i32>) -> SearchQuery {
        SearchQuery {
            page: 1,
            per_page: 10,
            keyword: keyword.to_string(),
            category_id,
        }
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_second_page_holds_rows_11_to_20(pool: PgPool) {
        let service = ReportService::new(pool);
        for day in 1..=25 {
            let report = payload(
                &format!("Report {}", day),
                &format!("report-{}", day),
                1,
                &format!("2024/01/{:02}", day),
            );
            service.create(&without_images(report)).await.unwrap();
        }

        let (page, total) = service.latest(&PaginationQuery::new(2, 10)).await.unwrap();

        assert_eq!(total, 25);
        let urls: Vec<String> = page.into_iter().map(|r| r.url).collect();
        let expected: Vec<String> = (6..=15).rev().map(|d| format!("report-{}", d)).collect();
        assert_eq!(urls, expected);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_search_matches_substring_newest_first(pool: PgPool) {
        let service = ReportService::new(pool);
        for report in [
            payload("Global Widget Market", "widget-market", 1, "2023/05/01"),
            payload("Smart WIDGETS Outlook", "smart-widgets", 1, "2024/02/01"),
            payload("Battery Market", "battery-market", 5, "2024/03/01"),
        ] {
            service.create(&without_images(report)).await.unwrap();
        }

        let (found, total) = service.search(&search("widget", None)).await.unwrap();
        assert_eq!(total, 2);
        let urls: Vec<&str> = found.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["smart-widgets", "widget-market"]);

        let (found, total) = service.search(&search("widget", Some(5))).await.unwrap();
        assert_eq!(total, 0);
        assert!(found.is_empty());

        // LIKE metacharacters are matched literally
        let (found, _) = service.search(&search("%", None)).await.unwrap();
        assert!(found.is_empty());
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_category_counts_sum_to_report_total(pool: PgPool) {
        let service = ReportService::new(pool);
        for report in [
            payload("Widget Market", "widget-market", 1, "2024/01/01"),
            payload("Gadget Market", "gadget-market", 1, "2024/01/02"),
            payload("Consulting Market", "consulting-market", 5, "2024/01/03"),
        ] {
            service.create(&without_images(report)).await.unwrap();
        }

        let counts = service.category_counts().await.unwrap();
        let listed = service.list().await.unwrap();

        let pairs: Vec<(&str, i64)> = counts
            .iter()
            .map(|c| (c.category_url.as_str(), c.count))
            .collect();
        assert_eq!(pairs, vec![("analytics", 2), ("services", 1)]);
        assert_eq!(counts.iter().map(|c| c.count).sum::<i64>(), listed.len() as i64);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_create_names_images_and_delete_cascades(pool: PgPool) {
        let service = ReportService::new(pool.clone());
        let images = ReportImageService::new(pool);

        let created = service
            .create(&CreateReportWithImagesDto {
                report: payload("Global Widget Market", "widget-market", 1, "2024/03/09"),
                images: vec![
                    ReportImageInput {
                        img_name: "RPXXX-cover".to_string(),
                        img_file: "cover.png".to_string(),
                    },
                    ReportImageInput {
                        img_name: "RPXXX-toc".to_string(),
                        img_file: "toc.png".to_string(),
                    },
                ],
            })
            .await
            .unwrap();

        let id = created.report.id;
        let names: Vec<String> = created.images.iter().map(|i| i.img_name.clone()).collect();
        assert_eq!(names, vec![format!("RP{}-cover", id), format!("RP{}-toc", id)]);
        assert!(created.images.iter().all(|i| i.report_id == Some(id)));
        assert_eq!(images.list_by_report(id).await.unwrap().len(), 2);

        service.delete(id).await.unwrap();

        assert!(images.search_by_name("RP").await.unwrap().is_empty());
        assert!(matches!(
            service.get_by_id(id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_bulk_create_is_all_or_nothing(pool: PgPool) {
        let service = ReportService::new(pool);

        let result = service
            .create_bulk(&[
                without_images(payload("Widget Market", "widget-market", 1, "2024/01/01")),
                without_images(payload("Widget Market Again", "widget-market", 1, "2024/01/02")),
            ])
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_unknown_id_url_and_category_are_not_found(pool: PgPool) {
        let service = ReportService::new(pool);
        let page = PaginationQuery::default();

        assert!(matches!(service.get_by_id(9999).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.get_by_url("no-such-market").await, Err(AppError::NotFound(_))));
        assert!(matches!(service.get_meta("no-such-market").await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(9999).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service
                .update(9999, &payload("Widget Market", "widget-market", 1, "2024/01/01"))
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.list_by_category("astrology", &page).await,
            Err(AppError::NotFound(_))
        ));

        let (all, total) = service.list_by_category("all-industries", &page).await.unwrap();
        assert!(all.is_empty());
        assert_eq!(total, 0);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_update_replaces_every_field(pool: PgPool) {
        let service = ReportService::new(pool);
        let created = service
            .create(&without_images(payload("Widget Market", "widget-market", 1, "2024/01/01")))
            .await
            .unwrap();

        let mut replacement = payload("Gadget Market", "gadget-market", 5, "2024-02-02");
        replacement.pages = "300".to_string();
        let updated = service.update(created.report.id, &replacement).await.unwrap();

        assert_eq!(updated.id, created.report.id);
        assert_eq!(updated.url, "gadget-market");
        assert_eq!(updated.category_id, 5);
        assert_eq!(updated.pages, "300");
        let detail = service.get_by_url("gadget-market").await.unwrap();
        assert_eq!(detail.category_url, "services");
    }
}
