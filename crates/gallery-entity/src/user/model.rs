//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique email address, stored trimmed and lower-cased.
    pub email: String,
    /// Unique login name, stored as given and compared case-insensitively.
    pub username: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar image URL.
    pub avatar: Option<String>,
    /// Deactivated accounts cannot log in.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account is usable for login.
    pub fn can_login(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Normalized email.
    pub email: String,
    /// Trimmed username.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Partial profile update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
}

impl UpdateProfile {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.avatar.is_none()
    }

    /// Apply the present fields to `user`.
    pub fn apply(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(avatar) = &self.avatar {
            let avatar = avatar.trim();
            user.avatar = (!avatar.is_empty()).then(|| avatar.to_string());
        }
    }
}

/// Canonical form of an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Canonical form of a username for storage. Lookups compare case-insensitively.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_string()
}
