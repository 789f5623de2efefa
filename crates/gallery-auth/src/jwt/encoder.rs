//! JWT token creation with a fixed validity window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use gallery_core::config::{AuthConfig, MAX_TOKEN_TTL_HOURS};
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::traits::Clock;
use gallery_entity::user::User;

use super::claims::Claims;

/// A freshly signed token and when it stops being valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
}

/// Creates signed HS256 identity tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Validity window.
    ttl: Duration,
    /// Time source for `iat`/`exp`.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::hours(config.token_ttl_hours.min(MAX_TOKEN_TTL_HOURS) as i64),
            clock,
        }
    }

    /// Issue a token for `user` valid from now until now + TTL.
    pub fn issue(&self, user: &User) -> Result<IssuedToken, AppError> {
        let now = self.clock.now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to encode token", e)
        })?;

        Ok(IssuedToken { token, expires_at })
    }
}
