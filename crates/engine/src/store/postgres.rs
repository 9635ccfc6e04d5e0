//! PostgreSQL gallery store.
//!
//! Listings are rendered from [`GalleryQuery`] with SeaQuery; point lookups
//! are plain bound queries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::GalleryStore;
use crate::models::{Gallery, GalleryKeyword, UpdateGalleryKeyword};
use crate::query::GalleryQuery;

const GALLERY_COLUMNS: &str = "id, name, description, slug, position, hidden, external, parent_id, children_count, keywords";

/// A [`GalleryStore`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgGalleryStore {
    pool: PgPool,
}

impl PgGalleryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl GalleryStore for PgGalleryStore {
    async fn find_gallery(&self, id: i64) -> Result<Option<Gallery>> {
        let gallery = sqlx::query_as::<_, Gallery>(&format!(
            "SELECT {GALLERY_COLUMNS} FROM galleries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch gallery")?;

        Ok(gallery)
    }

    async fn find_gallery_by_name(&self, name: &str) -> Result<Option<Gallery>> {
        let gallery = sqlx::query_as::<_, Gallery>(&format!(
            "SELECT {GALLERY_COLUMNS} FROM galleries WHERE name = $1 ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch gallery by name")?;

        Ok(gallery)
    }

    async fn list_galleries(&self, query: &GalleryQuery) -> Result<Vec<Gallery>> {
        let sql = query.to_sql();
        debug!(sql = %sql, "listing galleries");

        let galleries = sqlx::query_as::<_, Gallery>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("failed to list galleries")?;

        Ok(galleries)
    }

    async fn count_galleries(&self, query: &GalleryQuery) -> Result<u64> {
        let sql = query.to_count_sql();
        debug!(sql = %sql, "counting galleries");

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .context("failed to count galleries")?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn gallery_keywords(&self, gallery_id: i64) -> Result<Vec<GalleryKeyword>> {
        let keywords = sqlx::query_as::<_, GalleryKeyword>(
            "SELECT id, gallery_id, keyword FROM gallery_keywords WHERE gallery_id = $1 ORDER BY id",
        )
        .bind(gallery_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch gallery keywords")?;

        Ok(keywords)
    }

    async fn count_children(&self, gallery_id: i64) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM galleries WHERE parent_id = $1")
            .bind(gallery_id)
            .fetch_one(&self.pool)
            .await
            .context("failed to count child galleries")?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn count_items(&self, gallery_id: i64) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM gallery_items WHERE gallery_id = $1")
                .bind(gallery_id)
                .fetch_one(&self.pool)
                .await
                .context("failed to count gallery items")?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find_keyword(
        &self,
        gallery_id: i64,
        keyword_id: i64,
    ) -> Result<Option<GalleryKeyword>> {
        let keyword = sqlx::query_as::<_, GalleryKeyword>(
            "SELECT id, gallery_id, keyword FROM gallery_keywords WHERE id = $1 AND gallery_id = $2",
        )
        .bind(keyword_id)
        .bind(gallery_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch gallery keyword")?;

        Ok(keyword)
    }

    async fn update_keyword(
        &self,
        gallery_id: i64,
        keyword_id: i64,
        input: &UpdateGalleryKeyword,
    ) -> Result<Option<GalleryKeyword>> {
        let keyword = sqlx::query_as::<_, GalleryKeyword>(
            r#"
            UPDATE gallery_keywords
            SET keyword = $1
            WHERE id = $2 AND gallery_id = $3
            RETURNING id, gallery_id, keyword
            "#,
        )
        .bind(input.normalized())
        .bind(keyword_id)
        .bind(gallery_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to update gallery keyword")?;

        Ok(keyword)
    }

    async fn delete_keyword(&self, gallery_id: i64, keyword_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM gallery_keywords WHERE id = $1 AND gallery_id = $2")
            .bind(keyword_id)
            .bind(gallery_id)
            .execute(&self.pool)
            .await
            .context("failed to delete gallery keyword")?;

        Ok(result.rows_affected() > 0)
    }
}
