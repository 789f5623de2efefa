//! Request context carrying the authenticated identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gallery_auth::Claims;

/// Context for the current authenticated request.
///
/// Built from verified token claims by the HTTP layer and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username (convenience field from the token).
    pub username: String,
    /// The email (convenience field from the token).
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, username: String, email: String) -> Self {
        Self {
            user_id,
            username,
            email,
            request_time: Utc::now(),
        }
    }

    /// Builds a context from verified claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.username.clone(), claims.email.clone())
    }
}
