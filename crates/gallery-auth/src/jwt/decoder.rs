//! JWT token validation.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use gallery_core::config::AuthConfig;
use gallery_core::error::AppError;
use gallery_core::traits::Clock;

use super::claims::Claims;

/// Verifies identity tokens.
///
/// Verification fails closed: a malformed token, a bad signature, or an
/// expiry at or before the clock's current time all yield `Unauthorized`.
/// The explicit expiry comparison against [`Clock`] is authoritative; the
/// library's own `exp` check is kept as a second gate.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Time source for the expiry predicate.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Decode and validate a token string.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Token rejected");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized("Invalid token"),
                }
            })?;

        let claims = token_data.claims;
        if claims.is_expired_at(self.clock.now()) {
            debug!(user_id = %claims.sub, exp = claims.exp, "Token past expiry");
            return Err(AppError::unauthorized("Token has expired"));
        }
        Ok(claims)
    }
}
