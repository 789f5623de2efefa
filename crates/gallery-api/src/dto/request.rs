//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use gallery_entity::media::UpdateMediaAsset;
use gallery_entity::post::UpdatePost;
use gallery_entity::user::UpdateProfile;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Username.
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// First name.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
}

impl From<RegisterRequest> for gallery_service::RegisterRequest {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// First name.
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    /// Last name.
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    /// Avatar URL; an empty string clears it.
    #[validate(length(max = 2048))]
    pub avatar: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            avatar: req.avatar,
        }
    }
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    /// New password. Policy is enforced by the identity service.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Media metadata update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMediaRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// Description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Comma-separated tags.
    #[validate(length(max = 500))]
    pub tags: Option<String>,
    /// Visibility.
    pub is_public: Option<bool>,
}

impl From<UpdateMediaRequest> for UpdateMediaAsset {
    fn from(req: UpdateMediaRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            tags: req.tags,
            is_public: req.is_public,
        }
    }
}

/// Post creation request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    /// Comma-separated tags.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub tags: String,
    /// Visibility (default: public).
    pub is_public: Option<bool>,
    /// Media to attach, in display order.
    #[validate(length(min = 1, message = "At least one image is required"))]
    pub media_ids: Vec<Uuid>,
}

impl From<CreatePostRequest> for gallery_service::CreatePostRequest {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            tags: req.tags,
            is_public: req.is_public,
            media_ids: req.media_ids,
        }
    }
}

/// Post update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// Description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Comma-separated tags.
    #[validate(length(max = 500))]
    pub tags: Option<String>,
    /// Visibility.
    pub is_public: Option<bool>,
}

impl From<UpdatePostRequest> for UpdatePost {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            tags: req.tags,
            is_public: req.is_public,
        }
    }
}

/// `?query=` for search endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Substring to look for.
    #[serde(default)]
    pub query: String,
}

/// `?tags=a,b` for tag endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagsQuery {
    /// Comma-separated tags; all must match.
    #[serde(default)]
    pub tags: String,
}

/// `?width=&height=&crop=` for derived delivery URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformQuery {
    /// Target width in pixels.
    pub width: Option<u32>,
    /// Target height in pixels.
    pub height: Option<u32>,
    /// Crop mode understood by the object store (e.g. `fill`).
    pub crop: Option<String>,
}
