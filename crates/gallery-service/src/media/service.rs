//! Read access and ownership-gated updates for media assets.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use gallery_auth::OwnershipGuard;
use gallery_core::error::AppError;
use gallery_core::traits::{ObjectStore, TransformOptions};
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_database::store::MediaStore;
use gallery_entity::media::{MediaAsset, UpdateMediaAsset};
use gallery_entity::tags::parse_tags;

use crate::context::RequestContext;
use crate::views::ViewCounter;

/// Largest edge accepted for a derived delivery URL.
const MAX_TRANSFORM_EDGE: u32 = 4096;

/// Media asset queries and mutations.
#[derive(Debug, Clone)]
pub struct MediaService {
    /// Media metadata store.
    media: Arc<dyn MediaStore>,
    /// Remote object store, for derived URLs.
    objects: Arc<dyn ObjectStore>,
    /// Detached view counter.
    views: ViewCounter,
}

impl MediaService {
    /// Creates a new media service.
    pub fn new(media: Arc<dyn MediaStore>, objects: Arc<dyn ObjectStore>, views: ViewCounter) -> Self {
        Self {
            media,
            objects,
            views,
        }
    }

    /// Reads one asset and counts the view.
    ///
    /// Private assets are reported as missing to everyone but their owner.
    pub async fn get(&self, viewer: Option<Uuid>, media_id: Uuid) -> Result<MediaAsset, AppError> {
        let asset = self.find_visible(viewer, media_id).await?;
        self.views.record_media(asset.id);
        Ok(asset)
    }

    /// The current user's assets, newest first.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<MediaAsset>, AppError> {
        self.media.find_by_owner(ctx.user_id, &page).await
    }

    /// Public assets, newest first.
    pub async fn list_public(&self, page: PageRequest) -> Result<PageResponse<MediaAsset>, AppError> {
        self.media.find_public(&page).await
    }

    /// Public assets matching `query` in title, description, or tags.
    ///
    /// A blank query lists everything public.
    pub async fn search_public(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<PageResponse<MediaAsset>, AppError> {
        match query.trim() {
            "" => self.media.find_public(&page).await,
            q => self.media.search_public(q, &page).await,
        }
    }

    /// Public assets carrying every tag in the comma-separated `tags`.
    pub async fn by_tags(
        &self,
        tags: &str,
        page: PageRequest,
    ) -> Result<PageResponse<MediaAsset>, AppError> {
        let wanted = parse_tags(tags);
        if wanted.is_empty() {
            return Err(AppError::invalid_input("At least one tag is required"));
        }
        self.media.find_public_by_tags(&wanted, &page).await
    }

    /// Updates the metadata of an asset the current user owns.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        media_id: Uuid,
        changes: UpdateMediaAsset,
    ) -> Result<MediaAsset, AppError> {
        let mut asset = self
            .media
            .find_by_id(media_id)
            .await?
            .ok_or_else(|| AppError::not_found("Image not found"))?;

        OwnershipGuard::ensure_owner(ctx.user_id, asset.owner_id, "image")?;

        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(AppError::invalid_input("Title cannot be empty"));
            }
        }

        changes.apply(&mut asset);
        let asset = self.media.update(&asset).await?;

        info!(user_id = %ctx.user_id, media_id = %media_id, "Image updated");

        Ok(asset)
    }

    /// A resized delivery URL for a visible asset.
    pub async fn transform_url(
        &self,
        viewer: Option<Uuid>,
        media_id: Uuid,
        options: &TransformOptions,
    ) -> Result<String, AppError> {
        for edge in [options.width, options.height].into_iter().flatten() {
            if edge == 0 || edge > MAX_TRANSFORM_EDGE {
                return Err(AppError::invalid_input(format!(
                    "Width and height must be between 1 and {MAX_TRANSFORM_EDGE}"
                )));
            }
        }

        let asset = self.find_visible(viewer, media_id).await?;
        self.objects.transform_url(&asset.remote_ref, options)
    }

    async fn find_visible(&self, viewer: Option<Uuid>, media_id: Uuid) -> Result<MediaAsset, AppError> {
        self.media
            .find_by_id(media_id)
            .await?
            .filter(|asset| asset.is_visible_to(viewer))
            .ok_or_else(|| AppError::not_found("Image not found"))
    }
}
