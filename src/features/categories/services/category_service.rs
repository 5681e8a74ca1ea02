use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::models::Category;

const CATEGORY_COLUMNS: &str =
    "id, abr, name, url, icon, back_cover, meta_title, meta_desc, meta_keyword";

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories: Vec<Category> = sqlx::query_as(&format!(
            "SELECT {} FROM categories ORDER BY name ASC",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get_by_id(&self, id: i32) -> Result<CategoryResponseDto> {
        let category: Option<Category> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by id: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Get category by its url slug
    pub async fn get_by_url(&self, url: &str) -> Result<CategoryResponseDto> {
        let category: Option<Category> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE url = $1",
            CATEGORY_COLUMNS
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by url: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", url)))
    }

    /// Create a single category
    pub async fn create(&self, dto: &CreateCategoryDto) -> Result<CategoryResponseDto> {
        let mut tx = self.pool.begin().await?;
        let category = Self::insert(&mut tx, dto).await?;
        tx.commit().await?;

        tracing::info!("Created category {} ({})", category.id, category.url);
        Ok(category.into())
    }

    /// Create several categories; either all are stored or none
    pub async fn create_bulk(&self, dtos: &[CreateCategoryDto]) -> Result<Vec<CategoryResponseDto>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(dtos.len());
        for dto in dtos {
            created.push(Self::insert(&mut tx, dto).await?);
        }
        tx.commit().await?;

        tracing::info!("Created {} categories", created.len());
        Ok(created.into_iter().map(|c| c.into()).collect())
    }

    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        dto: &CreateCategoryDto,
    ) -> Result<Category> {
        sqlx::query_as(&format!(
            r#"
            INSERT INTO categories (abr, name, url, icon, back_cover, meta_title, meta_desc, meta_keyword)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        ))
        .bind(&dto.abr)
        .bind(&dto.name)
        .bind(&dto.url)
        .bind(&dto.icon)
        .bind(&dto.back_cover)
        .bind(&dto.meta_title)
        .bind(&dto.meta_desc)
        .bind(&dto.meta_keyword)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_db_error("Category"))
    }

    /// Map of lowercased category name to id, used to resolve names in spreadsheets
    pub async fn name_index(&self) -> Result<HashMap<String, i32>> {
        let rows: Vec<(i32, String)> = sqlx::query_as("SELECT id, name FROM categories")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load category names: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| (name.trim().to_lowercase(), id))
            .collect())
    }
}
