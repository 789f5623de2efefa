//! In-process implementation of every store trait.
//!
//! Rows live in insertion-ordered vectors behind one `tokio` `RwLock`, so
//! "newest first" is simply reverse insertion order. Writes take the write
//! lock, which makes `increment_views` exact here even though callers must
//! not rely on that. Media creates can be made to fail on demand to drive
//! the upload compensation path in tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_entity::media::{CreateMediaAsset, MediaAsset};
use gallery_entity::post::{CreatePost, Post};
use gallery_entity::tags::{matches_all_tags, matches_query};
use gallery_entity::user::{CreateUser, UpdateProfile, User};

use crate::store::{MediaStore, PostStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    media: Vec<MediaAsset>,
    posts: Vec<Post>,
}

/// Memory-backed [`UserStore`], [`MediaStore`], and [`PostStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_media_create: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent media create fail with a `Database` error.
    pub fn fail_media_creates(&self, fail: bool) {
        self.fail_media_create.store(fail, Ordering::SeqCst);
    }

    /// Number of live (not soft-deleted) media rows.
    pub async fn media_count(&self) -> usize {
        self.tables
            .read()
            .await
            .media
            .iter()
            .filter(|m| m.deleted_at.is_none())
            .count()
    }

    /// Raw stored password hash, including for inactive users.
    pub async fn password_hash_of(&self, id: Uuid) -> Option<String> {
        self.tables
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.password_hash.clone())
    }
}

fn paginate<T: Clone>(rows: Vec<&T>, page: &PageRequest) -> PageResponse<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .cloned()
        .collect();
    PageResponse::new(items, *page, total)
}

fn live_user(tables: &mut Tables, id: Uuid) -> AppResult<&mut User> {
    tables
        .users
        .iter_mut()
        .find(|u| u.id == id && u.deleted_at.is_none())
        .ok_or_else(|| AppError::not_found("User not found"))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let username = username.trim().to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username.to_lowercase() == username && u.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::email_exists());
        }
        let lowered = data.username.to_lowercase();
        if tables
            .users
            .iter()
            .any(|u| u.username.to_lowercase() == lowered)
        {
            return Err(AppError::username_exists());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            username: data.username.clone(),
            password_hash: data.password_hash.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            avatar: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, data: &UpdateProfile) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let user = live_user(&mut tables, id)?;
        data.apply(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = live_user(&mut tables, id)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = live_user(&mut tables, id)?;
        user.is_active = active;
        user.updated_at = Utc::now();
        Ok(())
    }
}

fn media_rows<'a>(
    tables: &'a Tables,
    keep: impl Fn(&MediaAsset) -> bool,
) -> Vec<&'a MediaAsset> {
    tables
        .media
        .iter()
        .rev()
        .filter(|m| m.deleted_at.is_none() && keep(*m))
        .collect()
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn create(&self, data: &CreateMediaAsset) -> AppResult<MediaAsset> {
        if self.fail_media_create.load(Ordering::SeqCst) {
            return Err(AppError::database("Failed to create media asset"));
        }
        let now = Utc::now();
        let asset = MediaAsset {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            title: data.title.clone(),
            description: data.description.clone(),
            remote_ref: data.remote_ref.clone(),
            url: data.url.clone(),
            width: data.width,
            height: data.height,
            size_bytes: data.size_bytes,
            format: data.format.clone(),
            tags: data.tags.clone(),
            is_public: data.is_public,
            view_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().await.media.push(asset.clone());
        Ok(asset)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MediaAsset>> {
        let tables = self.tables.read().await;
        Ok(tables
            .media
            .iter()
            .find(|m| m.id == id && m.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>> {
        let tables = self.tables.read().await;
        Ok(paginate(media_rows(&tables, |m| m.owner_id == owner_id), page))
    }

    async fn find_public(&self, page: &PageRequest) -> AppResult<PageResponse<MediaAsset>> {
        let tables = self.tables.read().await;
        Ok(paginate(media_rows(&tables, |m| m.is_public), page))
    }

    async fn search_public(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>> {
        let tables = self.tables.read().await;
        let rows = media_rows(&tables, |m| {
            m.is_public && matches_query(&[m.title.as_str(), m.description.as_str(), m.tags.as_str()], query)
        });
        Ok(paginate(rows, page))
    }

    async fn find_public_by_tags(
        &self,
        tags: &[String],
        page: &PageRequest,
    ) -> AppResult<PageResponse<MediaAsset>> {
        let tables = self.tables.read().await;
        let rows = media_rows(&tables, |m| m.is_public && matches_all_tags(&m.tags, tags));
        Ok(paginate(rows, page))
    }

    async fn update(&self, asset: &MediaAsset) -> AppResult<MediaAsset> {
        let mut tables = self.tables.write().await;
        let row = tables
            .media
            .iter_mut()
            .find(|m| m.id == asset.id && m.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("Image not found"))?;
        row.title = asset.title.clone();
        row.description = asset.description.clone();
        row.tags = asset.tags.clone();
        row.is_public = asset.is_public;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .media
            .iter_mut()
            .find(|m| m.id == id && m.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("Image not found"))?;
        row.deleted_at = Some(Utc::now());
        for post in tables.posts.iter_mut() {
            post.media_ids.retain(|m| *m != id);
        }
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(row) = tables
            .media
            .iter_mut()
            .find(|m| m.id == id && m.deleted_at.is_none())
        {
            row.view_count += 1;
        }
        Ok(())
    }
}

fn post_rows<'a>(tables: &'a Tables, keep: impl Fn(&Post) -> bool) -> Vec<&'a Post> {
    tables
        .posts
        .iter()
        .rev()
        .filter(|p| p.deleted_at.is_none() && keep(*p))
        .collect()
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            title: data.title.clone(),
            description: data.description.clone(),
            tags: data.tags.clone(),
            is_public: data.is_public,
            view_count: 0,
            media_ids: data.media_ids.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        let tables = self.tables.read().await;
        Ok(paginate(post_rows(&tables, |p| p.owner_id == owner_id), page))
    }

    async fn find_public(&self, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        let tables = self.tables.read().await;
        Ok(paginate(post_rows(&tables, |p| p.is_public), page))
    }

    async fn search_public(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        let tables = self.tables.read().await;
        let rows = post_rows(&tables, |p| {
            p.is_public && matches_query(&[p.title.as_str(), p.description.as_str(), p.tags.as_str()], query)
        });
        Ok(paginate(rows, page))
    }

    async fn find_public_by_tags(
        &self,
        tags: &[String],
        page: &PageRequest,
    ) -> AppResult<PageResponse<Post>> {
        let tables = self.tables.read().await;
        let rows = post_rows(&tables, |p| p.is_public && matches_all_tags(&p.tags, tags));
        Ok(paginate(rows, page))
    }

    async fn update(&self, post: &Post) -> AppResult<Post> {
        let mut tables = self.tables.write().await;
        let row = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id && p.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        row.title = post.title.clone();
        row.description = post.description.clone();
        row.tags = post.tags.clone();
        row.is_public = post.is_public;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(row) = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
        {
            row.view_count += 1;
        }
        Ok(())
    }
}
