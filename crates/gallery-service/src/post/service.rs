//! Post creation, queries, and ownership-gated mutations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use gallery_auth::OwnershipGuard;
use gallery_core::error::AppError;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_database::store::{MediaStore, PostStore};
use gallery_entity::post::{CreatePost, Post, UpdatePost, dedup_ids};
use gallery_entity::tags::{normalize_tags, parse_tags};

use crate::context::RequestContext;
use crate::views::ViewCounter;

/// Input for a new post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    /// Post title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: String,
    /// Visibility. Posts are public unless told otherwise.
    #[serde(default)]
    pub is_public: Option<bool>,
    /// Media to attach, in display order.
    #[serde(default)]
    pub media_ids: Vec<Uuid>,
}

/// Post queries and mutations.
#[derive(Debug, Clone)]
pub struct PostService {
    /// Post store.
    posts: Arc<dyn PostStore>,
    /// Media store, for attachment checks.
    media: Arc<dyn MediaStore>,
    /// Detached view counter.
    views: ViewCounter,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(posts: Arc<dyn PostStore>, media: Arc<dyn MediaStore>, views: ViewCounter) -> Self {
        Self {
            posts,
            media,
            views,
        }
    }

    /// Creates a post from media the current user owns.
    ///
    /// Every id is checked in request order and the first missing or
    /// foreign asset aborts the whole request; nothing is attached partially.
    pub async fn create(&self, ctx: &RequestContext, req: CreatePostRequest) -> Result<Post, AppError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Title is required"));
        }

        let media_ids = dedup_ids(&req.media_ids);
        if media_ids.is_empty() {
            return Err(AppError::invalid_input("At least one image is required"));
        }

        for id in &media_ids {
            let asset = self
                .media
                .find_by_id(*id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Image {id} not found")))?;
            OwnershipGuard::ensure_owner(ctx.user_id, asset.owner_id, "image")?;
        }

        let post = self
            .posts
            .create(&CreatePost {
                owner_id: ctx.user_id,
                title: title.to_string(),
                description: req.description.trim().to_string(),
                tags: normalize_tags(&req.tags),
                is_public: req.is_public.unwrap_or(true),
                media_ids,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            post_id = %post.id,
            media = post.media_ids.len(),
            "Post created"
        );

        Ok(post)
    }

    /// Reads one post and counts the view.
    pub async fn get(&self, viewer: Option<Uuid>, post_id: Uuid) -> Result<Post, AppError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .filter(|post| post.is_visible_to(viewer))
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        self.views.record_post(post.id);
        Ok(post)
    }

    /// The current user's posts, newest first.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Post>, AppError> {
        self.posts.find_by_owner(ctx.user_id, &page).await
    }

    /// Public posts, newest first.
    pub async fn list_public(&self, page: PageRequest) -> Result<PageResponse<Post>, AppError> {
        self.posts.find_public(&page).await
    }

    /// Public posts matching `query`; a blank query lists everything public.
    pub async fn search_public(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<PageResponse<Post>, AppError> {
        match query.trim() {
            "" => self.posts.find_public(&page).await,
            q => self.posts.search_public(q, &page).await,
        }
    }

    /// Public posts carrying every tag in the comma-separated `tags`.
    pub async fn by_tags(&self, tags: &str, page: PageRequest) -> Result<PageResponse<Post>, AppError> {
        let wanted = parse_tags(tags);
        if wanted.is_empty() {
            return Err(AppError::invalid_input("At least one tag is required"));
        }
        self.posts.find_public_by_tags(&wanted, &page).await
    }

    /// Updates a post the current user owns.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        changes: UpdatePost,
    ) -> Result<Post, AppError> {
        let mut post = self.find_existing(post_id).await?;
        OwnershipGuard::ensure_owner(ctx.user_id, post.owner_id, "post")?;

        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(AppError::invalid_input("Title cannot be empty"));
            }
        }

        changes.apply(&mut post);
        let post = self.posts.update(&post).await?;

        info!(user_id = %ctx.user_id, post_id = %post_id, "Post updated");

        Ok(post)
    }

    /// Deletes a post the current user owns. Its media stay.
    pub async fn delete(&self, ctx: &RequestContext, post_id: Uuid) -> Result<(), AppError> {
        let post = self.find_existing(post_id).await?;
        OwnershipGuard::ensure_owner(ctx.user_id, post.owner_id, "post")?;

        self.posts.delete(post_id).await?;

        info!(user_id = %ctx.user_id, post_id = %post_id, "Post deleted");

        Ok(())
    }

    async fn find_existing(&self, post_id: Uuid) -> Result<Post, AppError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }
}
