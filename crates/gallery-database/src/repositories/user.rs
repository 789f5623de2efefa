//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_entity::user::{CreateUser, UpdateProfile, User};

use super::db_error;
use crate::store::UserStore;

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = LOWER(TRIM($1)) AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user by email"))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER(TRIM($1)) AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user by username"))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, username, password_hash, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::email_exists()
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("users_username_lower_key") =>
            {
                AppError::username_exists()
            }
            other => db_error("Failed to create user")(other),
        })
    }

    async fn update_profile(&self, id: Uuid, data: &UpdateProfile) -> AppResult<User> {
        let avatar = data.avatar.as_deref().map(str::trim);
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                first_name = COALESCE(TRIM($2), first_name), \
                last_name = COALESCE(TRIM($3), last_name), \
                avatar = CASE WHEN $4::TEXT IS NULL THEN avatar ELSE NULLIF($4, '') END, \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update user profile"))?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update password"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET is_active = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update user status"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }
}
