//! Auth handlers: register and login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let session = state.identity_service.register(req.into()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session.into()))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let session = state
        .identity_service
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(session.into())))
}
