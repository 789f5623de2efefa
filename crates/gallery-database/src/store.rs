//! Store capability traits.
//!
//! Services hold these as `Arc<dyn ...>` so the backing implementation is
//! chosen once at composition time. Every read hides soft-deleted rows.
//! A missing row is `Ok(None)` on lookups and `NotFound` on mutations.

use async_trait::async_trait;
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_entity::media::{CreateMediaAsset, MediaAsset};
use gallery_entity::post::{CreatePost, Post};
use gallery_entity::user::{CreateUser, UpdateProfile, User};

/// Identity records and password hashes.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by username, case-insensitively.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new active user. Fails `EmailExists` / `UsernameExists` on
    /// a uniqueness race the caller's pre-checks did not catch.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Apply a partial profile update.
    async fn update_profile(&self, id: Uuid, data: &UpdateProfile) -> AppResult<User>;

    /// Replace the stored password hash.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Set the active flag.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()>;
}

/// Media asset metadata.
#[async_trait]
pub trait MediaStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a media asset row.
    async fn create(&self, data: &CreateMediaAsset) -> AppResult<MediaAsset>;

    /// Find an asset by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MediaAsset>>;

    /// All of one owner's assets, newest first.
    async fn find_by_owner(&self, owner_id: Uuid, page: &PageRequest)
    -> AppResult<PageResponse<MediaAsset>>;

    /// Public assets, newest first.
    async fn find_public(&self, page: &PageRequest) -> AppResult<PageResponse<MediaAsset>>;

    /// Public assets whose title, description, or tags contain `query`.
    async fn search_public(&self, query: &str, page: &PageRequest)
    -> AppResult<PageResponse<MediaAsset>>;

    /// Public assets whose tag string contains every tag in `tags`.
    async fn find_public_by_tags(
        &self,
        tags: &[String],
        page: &PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>>;

    /// Persist the mutable fields (title, description, tags, visibility).
    async fn update(&self, asset: &MediaAsset) -> AppResult<MediaAsset>;

    /// Soft-delete an asset and detach it from every post.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// `view_count = view_count + 1`.
    async fn increment_views(&self, id: Uuid) -> AppResult<()>;
}

/// Posts and their ordered media attachments.
#[async_trait]
pub trait PostStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a post and its attachments together.
    async fn create(&self, data: &CreatePost) -> AppResult<Post>;

    /// Find a post by primary key, with `media_ids` loaded.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// All of one owner's posts, newest first.
    async fn find_by_owner(&self, owner_id: Uuid, page: &PageRequest)
    -> AppResult<PageResponse<Post>>;

    /// Public posts, newest first.
    async fn find_public(&self, page: &PageRequest) -> AppResult<PageResponse<Post>>;

    /// Public posts whose title, description, or tags contain `query`.
    async fn search_public(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<Post>>;

    /// Public posts whose tag string contains every tag in `tags`.
    async fn find_public_by_tags(
        &self,
        tags: &[String],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Post>>;

    /// Persist the mutable fields (title, description, tags, visibility).
    async fn update(&self, post: &Post) -> AppResult<Post>;

    /// Soft-delete a post. Its media assets are untouched.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// `view_count = view_count + 1`.
    async fn increment_views(&self, id: Uuid) -> AppResult<()>;
}
