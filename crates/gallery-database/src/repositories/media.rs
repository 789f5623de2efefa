//! Media asset repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_entity::media::{CreateMediaAsset, MediaAsset};

use super::db_error;
use super::listing::{Listing, fetch_page};
use crate::store::MediaStore;

const TABLE: &str = "media_assets";

/// PostgreSQL-backed [`MediaStore`].
#[derive(Debug, Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Create a new media repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for MediaRepository {
    async fn create(&self, data: &CreateMediaAsset) -> AppResult<MediaAsset> {
        sqlx::query_as::<_, MediaAsset>(
            "INSERT INTO media_assets \
                (owner_id, title, description, remote_ref, url, width, height, size_bytes, format, tags, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING *",
        )
        .bind(data.owner_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.remote_ref)
        .bind(&data.url)
        .bind(data.width)
        .bind(data.height)
        .bind(data.size_bytes)
        .bind(&data.format)
        .bind(&data.tags)
        .bind(data.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create media asset"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MediaAsset>> {
        sqlx::query_as::<_, MediaAsset>(
            "SELECT * FROM media_assets WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find media asset"))
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>> {
        fetch_page(&self.pool, TABLE, Listing::Owner(owner_id), page).await
    }

    async fn find_public(&self, page: &PageRequest) -> AppResult<PageResponse<MediaAsset>> {
        fetch_page(&self.pool, TABLE, Listing::Public, page).await
    }

    async fn search_public(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>> {
        fetch_page(&self.pool, TABLE, Listing::Search(query), page).await
    }

    async fn find_public_by_tags(
        &self,
        tags: &[String],
        page: &PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>> {
        fetch_page(&self.pool, TABLE, Listing::Tags(tags), page).await
    }

    async fn update(&self, asset: &MediaAsset) -> AppResult<MediaAsset> {
        sqlx::query_as::<_, MediaAsset>(
            "UPDATE media_assets SET \
                title = $2, description = $3, tags = $4, is_public = $5, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING *",
        )
        .bind(asset.id)
        .bind(&asset.title)
        .bind(&asset.description)
        .bind(&asset.tags)
        .bind(asset.is_public)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update media asset"))?
        .ok_or_else(|| AppError::not_found("Image not found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let result = sqlx::query(
            "UPDATE media_assets SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to delete media asset"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Image not found"));
        }

        sqlx::query("DELETE FROM post_media WHERE media_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to detach media asset from posts"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit media delete"))
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE media_assets SET view_count = view_count + 1 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to increment media view count"))?;
        Ok(())
    }
}
