//! Identity lifecycle manager.
//!
//! Tokens are stateless: deactivating an account stops new logins and
//! token refreshes, but tokens issued before deactivation stay valid until
//! they expire.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use gallery_auth::jwt::{IssuedToken, JwtEncoder};
use gallery_auth::password::{PasswordHasher, PasswordValidator};
use gallery_core::error::AppError;
use gallery_database::store::UserStore;
use gallery_entity::user::{CreateUser, UpdateProfile, User, normalize_email, normalize_username};

use crate::context::RequestContext;

/// Registration input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Public handle.
    pub username: String,
    /// Raw password. Hashed before it reaches the store.
    pub password: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
}

/// An identity together with a freshly issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated user.
    pub user: User,
    /// Signed token and its expiry.
    pub token: IssuedToken,
}

/// Handles registration, login, and self-service account operations.
#[derive(Debug, Clone)]
pub struct IdentityService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: Arc<PasswordValidator>,
}

impl IdentityService {
    /// Creates a new identity service.
    pub fn new(
        users: Arc<dyn UserStore>,
        encoder: Arc<JwtEncoder>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            encoder,
            hasher,
            validator,
        }
    }

    /// Registers a new active user and signs them in.
    ///
    /// Uniqueness is checked email first, then username.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthSession, AppError> {
        let email = normalize_email(&req.email);
        let username = normalize_username(&req.username);

        if email.is_empty() || !email.contains('@') {
            return Err(AppError::invalid_input("A valid email is required"));
        }
        if username.is_empty() {
            return Err(AppError::invalid_input("Username is required"));
        }
        self.validator.validate(&req.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::email_exists());
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::username_exists());
        }

        let password_hash = self.hasher.hash_password(&req.password)?;

        let user = self
            .users
            .create(&CreateUser {
                email,
                username,
                password_hash,
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
            })
            .await?;

        let token = self.encoder.issue(&user)?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthSession { user, token })
    }

    /// Authenticates by email and password.
    ///
    /// Unknown email and wrong password are indistinguishable. The password
    /// is checked before the active flag, so only the account holder learns
    /// that an account is deactivated.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::invalid_credentials());
        }

        if !user.can_login() {
            warn!(user_id = %user.id, "Login refused: account deactivated");
            return Err(AppError::forbidden("Account is deactivated"));
        }

        let token = self.encoder.issue(&user)?;

        info!(user_id = %user.id, "User logged in");

        Ok(AuthSession { user, token })
    }

    /// Gets a user's profile.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Applies a partial profile update for the current user.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        changes: UpdateProfile,
    ) -> Result<User, AppError> {
        if changes.is_empty() {
            return self.get_profile(ctx.user_id).await;
        }

        let user = self.users.update_profile(ctx.user_id, &changes).await?;

        info!(user_id = %ctx.user_id, "Profile updated");

        Ok(user)
    }

    /// Changes the current user's password.
    ///
    /// A wrong current password leaves the stored hash untouched.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.get_profile(ctx.user_id).await?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            warn!(user_id = %ctx.user_id, "Password change refused: wrong current password");
            return Err(AppError::invalid_credentials());
        }

        self.validator.validate(new_password)?;
        self.validator
            .validate_not_same(current_password, new_password)?;

        let new_hash = self.hasher.hash_password(new_password)?;
        self.users.update_password(ctx.user_id, &new_hash).await?;

        info!(user_id = %ctx.user_id, "Password changed");

        Ok(())
    }

    /// Issues a fresh token for an active user.
    pub async fn issue_token(&self, user_id: Uuid) -> Result<AuthSession, AppError> {
        let user = self.get_profile(user_id).await?;

        if !user.can_login() {
            return Err(AppError::forbidden("Account is deactivated"));
        }

        let token = self.encoder.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Deactivates the current user's account.
    pub async fn deactivate(&self, ctx: &RequestContext) -> Result<(), AppError> {
        self.users.set_active(ctx.user_id, false).await?;

        info!(user_id = %ctx.user_id, "Account deactivated");

        Ok(())
    }
}
