//! Media asset entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded image and the remote object that holds its bytes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaAsset {
    /// Unique asset identifier.
    pub id: Uuid,
    /// Owning user. Never changes after creation.
    pub owner_id: Uuid,
    /// Title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Provider-assigned object reference.
    pub remote_ref: String,
    /// Public URL of the stored object.
    pub url: String,
    /// Pixel width.
    pub width: i32,
    /// Pixel height.
    pub height: i32,
    /// Stored size in bytes.
    pub size_bytes: i64,
    /// Image format reported by the store.
    pub format: String,
    /// Comma-separated tags.
    pub tags: String,
    /// Visible to everyone when `true`, only to the owner otherwise.
    pub is_public: bool,
    /// Best-effort view counter.
    pub view_count: i64,
    /// When the asset was created.
    pub created_at: DateTime<Utc>,
    /// When the asset was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl MediaAsset {
    /// Check if `user_id` owns this asset.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Whether `viewer` may read this asset.
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.is_public || viewer.is_some_and(|v| self.is_owned_by(v))
    }
}

/// Data required to create a media asset row after a confirmed upload.
#[derive(Debug, Clone)]
pub struct CreateMediaAsset {
    /// Owning user.
    pub owner_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Provider-assigned object reference.
    pub remote_ref: String,
    /// Public URL.
    pub url: String,
    /// Pixel width.
    pub width: i32,
    /// Pixel height.
    pub height: i32,
    /// Stored size in bytes.
    pub size_bytes: i64,
    /// Image format.
    pub format: String,
    /// Normalized tag string.
    pub tags: String,
    /// Visibility.
    pub is_public: bool,
}

/// Partial media update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMediaAsset {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New tag string.
    pub tags: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl UpdateMediaAsset {
    /// Apply the present fields to `asset`.
    pub fn apply(&self, asset: &mut MediaAsset) {
        if let Some(title) = &self.title {
            asset.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            asset.description = description.clone();
        }
        if let Some(tags) = &self.tags {
            asset.tags = crate::tags::normalize_tags(tags);
        }
        if let Some(is_public) = self.is_public {
            asset.is_public = is_public;
        }
    }
}
