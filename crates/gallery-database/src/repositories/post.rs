//! Post repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_entity::post::{CreatePost, Post};

use super::db_error;
use super::listing::{Listing, fetch_page};
use crate::store::PostStore;

const TABLE: &str = "posts";

/// PostgreSQL-backed [`PostStore`].
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fill `media_ids` on each post from `post_media`, skipping deleted media.
    async fn load_media_ids(&self, posts: &mut [Post]) -> AppResult<()> {
        if posts.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT pm.post_id, pm.media_id FROM post_media pm \
             JOIN media_assets m ON m.id = pm.media_id \
             WHERE pm.post_id = ANY($1) AND m.deleted_at IS NULL \
             ORDER BY pm.post_id, pm.position",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load post media"))?;

        for post in posts.iter_mut() {
            post.media_ids = rows
                .iter()
                .filter(|(post_id, _)| *post_id == post.id)
                .map(|(_, media_id)| *media_id)
                .collect();
        }
        Ok(())
    }

    async fn page_with_media(&self, listing: Listing<'_>, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        let mut result: PageResponse<Post> = fetch_page(&self.pool, TABLE, listing, page).await?;
        self.load_media_ids(&mut result.items).await?;
        Ok(result)
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let mut post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (owner_id, title, description, tags, is_public) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(data.owner_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.tags)
        .bind(data.is_public)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create post"))?;

        sqlx::query(
            "INSERT INTO post_media (post_id, media_id, position) \
             SELECT $1, media_id, (ord - 1)::INTEGER \
             FROM UNNEST($2::UUID[]) WITH ORDINALITY AS t(media_id, ord)",
        )
        .bind(post.id)
        .bind(&data.media_ids)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to attach media to post"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit post"))?;

        post.media_ids = data.media_ids.clone();
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find post"))?;

        match post {
            Some(post) => {
                let mut posts = [post];
                self.load_media_ids(&mut posts).await?;
                let [post] = posts;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner_id: Uuid, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        self.page_with_media(Listing::Owner(owner_id), page).await
    }

    async fn find_public(&self, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        self.page_with_media(Listing::Public, page).await
    }

    async fn search_public(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        self.page_with_media(Listing::Search(query), page).await
    }

    async fn find_public_by_tags(
        &self,
        tags: &[String],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Post>> {
        self.page_with_media(Listing::Tags(tags), page).await
    }

    async fn update(&self, post: &Post) -> AppResult<Post> {
        let mut updated = sqlx::query_as::<_, Post>(
            "UPDATE posts SET \
                title = $2, description = $3, tags = $4, is_public = $5, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING *",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.tags)
        .bind(post.is_public)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update post"))?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

        updated.media_ids = post.media_ids.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to delete post"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Post not found"));
        }
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE posts SET view_count = view_count + 1 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to increment post view count"))?;
        Ok(())
    }
}
