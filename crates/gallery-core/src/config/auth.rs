//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted token validity window: one year.
pub const MAX_TOKEN_TTL_HOURS: u64 = 8760;

/// Token signing and password policy configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256). Must be supplied.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token validity window in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

// Keep the secret out of `{:?}` output.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

fn default_token_ttl() -> u64 {
    24
}

fn default_password_min() -> usize {
    6
}
