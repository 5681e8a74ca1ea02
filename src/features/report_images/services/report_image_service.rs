use sqlx::{PgConnection, PgPool};

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::report_images::dtos::{ReportImageResponseDto, UpsertReportImageDto};
use crate::features::report_images::models::ReportImage;
use crate::shared::query::contains_pattern;

const IMAGE_COLUMNS: &str = "id, report_id, img_name, img_file";

/// Service for report image operations
pub struct ReportImageService {
    pool: PgPool,
}

impl ReportImageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an image, or replace the file of the image with the same name
    pub async fn upsert(&self, dto: &UpsertReportImageDto) -> Result<ReportImageResponseDto> {
        if let Some(report_id) = dto.report_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reports WHERE id = $1)")
                    .bind(report_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                return Err(AppError::NotFound(format!("Report {} not found", report_id)));
            }
        }

        let image: ReportImage = sqlx::query_as(&format!(
            r#"
            INSERT INTO report_images (report_id, img_name, img_file)
            VALUES ($1, $2, $3)
            ON CONFLICT (img_name) DO UPDATE
            SET img_file = EXCLUDED.img_file,
                report_id = COALESCE(EXCLUDED.report_id, report_images.report_id)
            RETURNING {}
            "#,
            IMAGE_COLUMNS
        ))
        .bind(dto.report_id)
        .bind(&dto.img_name)
        .bind(&dto.img_file)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Report image"))?;

        tracing::info!("Upserted report image {} ({})", image.id, image.img_name);
        Ok(image.into())
    }

    /// Images whose name contains `name`, case-sensitive
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<ReportImageResponseDto>> {
        let images: Vec<ReportImage> = sqlx::query_as(&format!(
            "SELECT {} FROM report_images WHERE img_name LIKE $1 ORDER BY id ASC",
            IMAGE_COLUMNS
        ))
        .bind(contains_pattern(name))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search report images: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(images.into_iter().map(|i| i.into()).collect())
    }

    /// Images owned by a report
    pub async fn list_by_report(&self, report_id: i32) -> Result<Vec<ReportImageResponseDto>> {
        let images: Vec<ReportImage> = sqlx::query_as(&format!(
            "SELECT {} FROM report_images WHERE report_id = $1 ORDER BY id ASC",
            IMAGE_COLUMNS
        ))
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list report images: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(images.into_iter().map(|i| i.into()).collect())
    }

    /// Insert an image inside a caller's transaction
    pub async fn insert_owned(
        conn: &mut PgConnection,
        report_id: i32,
        img_name: &str,
        img_file: &str,
    ) -> Result<ReportImage> {
        sqlx::query_as(&format!(
            r#"
            INSERT INTO report_images (report_id, img_name, img_file)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            IMAGE_COLUMNS
        ))
        .bind(report_id)
        .bind(img_name)
        .bind(img_file)
        .fetch_one(conn)
        .await
        .map_err(map_db_error("Report image"))
    }

    /// Delete an image by id
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM report_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report image: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report image {} not found", id)));
        }

        tracing::info!("Deleted report image {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_report(pool: &PgPool, url: &str) -> i32 {
        sqlx::query_scalar(
            "INSERT INTO reports (title, url, category_id, created_date) VALUES ($1, $1, 1, '2024/01/01') RETURNING id",
        )
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn upsert_dto(img_name: &str, img_file: &str, report_id: Option<i32>) -> UpsertReportImageDto {
        UpsertReportImageDto {
            img_name: img_name.to_string(),
            img_file: img_file.to_string(),
            report_id,
        }
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_upsert_overwrites_by_name(pool: PgPool) {
        let report_id = seed_report(&pool, "widget-market").await;
        let service = ReportImageService::new(pool);

        let first = service
            .upsert(&upsert_dto("RP1-cover", "old.png", Some(report_id)))
            .await
            .unwrap();
        let second = service
            .upsert(&upsert_dto("RP1-cover", "new.png", None))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.img_file, "new.png");
        // an omitted report_id keeps the existing owner
        assert_eq!(second.report_id, Some(report_id));
        assert_eq!(service.search_by_name("RP1").await.unwrap().len(), 1);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_upsert_with_unknown_report_is_not_found(pool: PgPool) {
        let service = ReportImageService::new(pool);

        let result = service
            .upsert(&upsert_dto("RP9-cover", "cover.png", Some(9999)))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(service.search_by_name("RP9").await.unwrap().is_empty());
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_search_is_literal_and_case_sensitive(pool: PgPool) {
        let service = ReportImageService::new(pool);
        for name in ["RP1-cover", "rp1-toc", "RP1_100%"] {
            service.upsert(&upsert_dto(name, "x.png", None)).await.unwrap();
        }

        let names = |images: Vec<ReportImageResponseDto>| -> Vec<String> {
            images.into_iter().map(|i| i.img_name).collect()
        };
        assert_eq!(
            names(service.search_by_name("RP1").await.unwrap()),
            vec!["RP1-cover", "RP1_100%"]
        );
        assert_eq!(
            names(service.search_by_name("100%").await.unwrap()),
            vec!["RP1_100%"]
        );
        assert!(service.search_by_name("RP1_1000").await.unwrap().is_empty());
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_delete_unknown_id_is_not_found(pool: PgPool) {
        let service = ReportImageService::new(pool);
        let image = service
            .upsert(&upsert_dto("RP1-cover", "cover.png", None))
            .await
            .unwrap();

        service.delete(image.id).await.unwrap();
        assert!(matches!(service.delete(image.id).await, Err(AppError::NotFound(_))));
    }
}
