//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user-authored grouping of media assets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Comma-separated tags.
    pub tags: String,
    /// Visible to everyone when `true`, only to the owner otherwise.
    pub is_public: bool,
    /// Best-effort view counter.
    pub view_count: i64,
    /// Attached media assets in display order. Loaded from `post_media`.
    #[sqlx(skip)]
    #[serde(default)]
    pub media_ids: Vec<Uuid>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Check if `user_id` owns this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Whether `viewer` may read this post.
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.is_public || viewer.is_some_and(|v| self.is_owned_by(v))
    }
}

/// Data required to create a post with its attachments.
#[derive(Debug, Clone)]
pub struct CreatePost {
    /// Owning user.
    pub owner_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Normalized tag string.
    pub tags: String,
    /// Visibility.
    pub is_public: bool,
    /// Already-validated media ids, in display order, without duplicates.
    pub media_ids: Vec<Uuid>,
}

/// Partial post update; attachments are not changed by updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePost {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New tag string.
    pub tags: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl UpdatePost {
    /// Apply the present fields to `post`.
    pub fn apply(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            post.description = description.clone();
        }
        if let Some(tags) = &self.tags {
            post.tags = crate::tags::normalize_tags(tags);
        }
        if let Some(is_public) = self.is_public {
            post.is_public = is_public;
        }
    }
}

/// Drop repeated ids while keeping first-seen order.
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
