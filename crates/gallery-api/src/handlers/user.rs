//! User self-service handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{ChangePasswordRequest, UpdateProfileRequest};
use crate::dto::response::{ApiResponse, AuthResponse, MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.identity_service.get_profile(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .identity_service
        .update_profile(&auth, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .identity_service
        .change_password(&auth, &req.old_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password changed successfully",
    ))))
}

/// POST /api/token
pub async fn refresh_token(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let session = state.identity_service.issue_token(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(session.into())))
}

/// POST /api/account/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.identity_service.deactivate(&auth).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Account deactivated",
    ))))
}
