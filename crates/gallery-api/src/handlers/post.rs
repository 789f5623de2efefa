//! Post handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use gallery_core::types::pagination::PageResponse;
use gallery_entity::post::Post;

use crate::dto::request::{CreatePostRequest, SearchQuery, TagsQuery, UpdatePostRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MaybeAuthUser, PaginationParams, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /api/posts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Post>>)> {
    let post = state.post_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

/// GET /api/posts/my
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Post>>>> {
    let page = state
        .post_service
        .list_mine(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/posts/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Post>>> {
    let post = state
        .post_service
        .get(Some(auth.user_id), parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<ApiResponse<Post>>> {
    let post = state
        .post_service
        .update(&auth, parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.post_service.delete(&auth, parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Post deleted"))))
}

/// GET /public/posts
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Post>>>> {
    let page = state
        .post_service
        .list_public(params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /public/posts/search?query=
pub async fn search_public(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Post>>>> {
    let page = state
        .post_service
        .search_public(&search.query, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /public/posts/tags?tags=a,b
pub async fn by_tags(
    State(state): State<AppState>,
    Query(filter): Query<TagsQuery>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Post>>>> {
    let page = state
        .post_service
        .by_tags(&filter.tags, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /public/posts/{id}
pub async fn get_public(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Post>>> {
    let post = state
        .post_service
        .get(viewer.user_id(), parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(post)))
}
