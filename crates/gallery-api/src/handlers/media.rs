//! Media upload, read, update, and delete handlers.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;

use gallery_core::error::AppError;
use gallery_core::traits::TransformOptions;
use gallery_core::types::pagination::PageResponse;
use gallery_entity::media::MediaAsset;
use gallery_service::UploadRequest;

use crate::dto::request::{SearchQuery, TagsQuery, TransformQuery, UpdateMediaRequest};
use crate::dto::response::{ApiResponse, MessageResponse, TransformResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MaybeAuthUser, PaginationParams, ValidatedJson, parse_uuid};
use crate::state::AppState;

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::file_too_large("File exceeds the maximum upload size")
    } else {
        AppError::invalid_input(format!("Multipart error: {}", e.body_text()))
    }
}

fn parse_bool(text: &str) -> Result<bool, AppError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::invalid_input(format!(
            "is_public must be true or false, got '{other}'"
        ))),
    }
}

/// POST /api/images (multipart: file, title, description, tags, is_public)
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<MediaAsset>>)> {
    let mut title = String::new();
    let mut description = String::new();
    let mut tags = String::new();
    let mut is_public: Option<bool> = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::invalid_input("file must carry a filename"))?;
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, data));
            }
            "title" => title = field.text().await.map_err(multipart_error)?,
            "description" => description = field.text().await.map_err(multipart_error)?,
            "tags" => tags = field.text().await.map_err(multipart_error)?,
            "is_public" => {
                is_public = Some(parse_bool(&field.text().await.map_err(multipart_error)?)?)
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| AppError::invalid_input("file is required"))?;

    let asset = state
        .upload_service
        .upload(
            &auth,
            UploadRequest {
                title,
                description,
                tags,
                is_public,
                filename,
                data,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(asset))))
}

/// GET /api/images/my
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<MediaAsset>>>> {
    let page = state
        .media_service
        .list_mine(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/images/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MediaAsset>>> {
    let asset = state
        .media_service
        .get(Some(auth.user_id), parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(asset)))
}

/// PUT /api/images/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateMediaRequest>,
) -> ApiResult<Json<ApiResponse<MediaAsset>>> {
    let asset = state
        .media_service
        .update(&auth, parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(asset)))
}

/// DELETE /api/images/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.upload_service.delete(&auth, parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Image deleted"))))
}

/// GET /public/images
pub async fn list_public(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<MediaAsset>>>> {
    let page = state
        .media_service
        .list_public(params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /public/images/search?query=
pub async fn search_public(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<MediaAsset>>>> {
    let page = state
        .media_service
        .search_public(&search.query, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /public/images/tags?tags=a,b
pub async fn by_tags(
    State(state): State<AppState>,
    Query(filter): Query<TagsQuery>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<MediaAsset>>>> {
    let page = state
        .media_service
        .by_tags(&filter.tags, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /public/images/{id}
pub async fn get_public(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MediaAsset>>> {
    let asset = state
        .media_service
        .get(viewer.user_id(), parse_uuid(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(asset)))
}

/// GET /public/images/{id}/transform?width=&height=&crop=
pub async fn transform(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
    Query(query): Query<TransformQuery>,
) -> ApiResult<Json<ApiResponse<TransformResponse>>> {
    let id = parse_uuid(&id)?;
    let options = TransformOptions {
        width: query.width,
        height: query.height,
        crop: query.crop.filter(|c| !c.trim().is_empty()),
    };

    let url = state
        .media_service
        .transform_url(viewer.user_id(), id, &options)
        .await?;
    Ok(Json(ApiResponse::ok(TransformResponse { id, url })))
}
