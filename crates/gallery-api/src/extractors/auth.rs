//! `AuthUser` extractor: pulls the JWT from the Authorization header,
//! verifies it, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use gallery_core::error::AppError;
use gallery_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Like [`AuthUser`], but anonymous requests and bad tokens yield `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

impl MaybeAuthUser {
    /// The viewer's user ID, if any.
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }
}

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let header = header.ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?
        .trim();

    if token.is_empty() {
        return Err(AppError::unauthorized("Empty bearer token"));
    }
    Ok(token)
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<RequestContext, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = bearer_token(header)?;
    let claims = state.jwt_decoder.verify(token)?;

    Ok(RequestContext::from_claims(&claims))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(AuthUser(authenticate(parts, state)?))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state) {
            Ok(ctx) => Ok(MaybeAuthUser(Some(ctx))),
            Err(e) => {
                debug!(reason = %e.message, "Treating request as anonymous");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
