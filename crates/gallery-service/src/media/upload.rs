//! Upload orchestration across the remote object store and the metadata
//! store.
//!
//! ```text
//! Validating -> Uploading -> PersistingMetadata -> Done
//!                                 |
//!                                 +-- failure --> CompensatingDelete -> Failed
//! ```
//!
//! A metadata failure after a successful remote upload always triggers
//! exactly one delete attempt for that object before the original error is
//! returned. The sequence runs on its own task, so a caller that goes away
//! mid-upload cannot stop it short of a terminal stage.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use gallery_auth::OwnershipGuard;
use gallery_core::config::StorageConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::traits::{ObjectStore, UploadedObject};
use gallery_database::store::MediaStore;
use gallery_entity::media::{CreateMediaAsset, MediaAsset};
use gallery_entity::tags::normalize_tags;

use crate::context::RequestContext;

/// Stages of one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    /// Checking file name and size.
    Validating,
    /// Sending bytes to the remote object store.
    Uploading,
    /// Writing the media row.
    PersistingMetadata,
    /// Removing the remote object after a metadata failure.
    CompensatingDelete,
    /// The asset exists in both systems.
    Done,
    /// The upload was abandoned.
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validating => "validating",
            Self::Uploading => "uploading",
            Self::PersistingMetadata => "persisting_metadata",
            Self::CompensatingDelete => "compensating_delete",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One image upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Display title. Falls back to the file name when blank.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Comma-separated tags.
    pub tags: String,
    /// Visibility override. Uploads are public unless told otherwise.
    pub is_public: Option<bool>,
    /// Client-supplied file name.
    pub filename: String,
    /// Raw file bytes.
    pub data: Bytes,
}

/// Coordinates uploads and deletes across the two stores.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Media metadata store.
    media: Arc<dyn MediaStore>,
    /// Remote object store.
    objects: Arc<dyn ObjectStore>,
    /// Upload limits and target folder.
    config: Arc<StorageConfig>,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        media: Arc<dyn MediaStore>,
        objects: Arc<dyn ObjectStore>,
        config: Arc<StorageConfig>,
    ) -> Self {
        Self {
            media,
            objects,
            config,
        }
    }

    /// Uploads an image and records it for the current user.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> Result<MediaAsset, AppError> {
        let this = self.clone();
        let owner_id = ctx.user_id;

        tokio::spawn(async move { this.run(owner_id, req).await })
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Upload task aborted", e))?
    }

    async fn run(&self, owner_id: Uuid, req: UploadRequest) -> Result<MediaAsset, AppError> {
        let mut stage = UploadStage::Validating;
        debug!(user_id = %owner_id, filename = %req.filename, %stage, "Upload started");

        if let Err(e) = self.validate(&req) {
            stage = UploadStage::Failed;
            debug!(user_id = %owner_id, %stage, error = %e, "Upload rejected");
            return Err(e);
        }

        stage = UploadStage::Uploading;
        debug!(user_id = %owner_id, size = req.data.len(), %stage, "Sending to object store");

        let uploaded = match self
            .objects
            .upload(req.data.clone(), &req.filename, &self.config.folder)
            .await
        {
            Ok(uploaded) => uploaded,
            Err(e) => {
                stage = UploadStage::Failed;
                warn!(
                    user_id = %owner_id,
                    provider = self.objects.provider_type(),
                    %stage,
                    error = %e,
                    "Remote upload failed"
                );
                if e.is(ErrorKind::InvalidFileType) {
                    return Err(e);
                }
                return Err(AppError::with_source(
                    ErrorKind::UploadFailed,
                    "Failed to upload image",
                    e,
                ));
            }
        };

        stage = UploadStage::PersistingMetadata;
        debug!(user_id = %owner_id, reference = %uploaded.reference, %stage, "Recording asset");

        let record = self.record_for(owner_id, &req, &uploaded);

        match self.media.create(&record).await {
            Ok(asset) => {
                stage = UploadStage::Done;
                info!(
                    user_id = %owner_id,
                    media_id = %asset.id,
                    reference = %asset.remote_ref,
                    size = asset.size_bytes,
                    %stage,
                    "Image uploaded"
                );
                Ok(asset)
            }
            Err(persist_err) => {
                stage = UploadStage::CompensatingDelete;
                error!(
                    user_id = %owner_id,
                    reference = %uploaded.reference,
                    %stage,
                    error = %persist_err,
                    "Failed to record upload, deleting remote object"
                );

                if let Err(delete_err) = self.objects.delete(&uploaded.reference).await {
                    error!(
                        reference = %uploaded.reference,
                        error = %delete_err,
                        "Compensating delete failed, remote object is orphaned"
                    );
                }

                stage = UploadStage::Failed;
                debug!(user_id = %owner_id, %stage, "Upload rolled back");

                Err(persist_err)
            }
        }
    }

    /// Deletes an asset the current user owns.
    ///
    /// The remote object goes first; if that fails the local row is removed
    /// anyway.
    pub async fn delete(&self, ctx: &RequestContext, media_id: Uuid) -> Result<(), AppError> {
        let asset = self
            .media
            .find_by_id(media_id)
            .await?
            .ok_or_else(|| AppError::not_found("Image not found"))?;

        OwnershipGuard::ensure_owner(ctx.user_id, asset.owner_id, "image")?;

        if let Err(e) = self.objects.delete(&asset.remote_ref).await {
            warn!(
                media_id = %media_id,
                reference = %asset.remote_ref,
                error = %e,
                "Remote delete failed, removing local record anyway"
            );
        }

        self.media.delete(media_id).await?;

        info!(user_id = %ctx.user_id, media_id = %media_id, "Image deleted");

        Ok(())
    }

    fn validate(&self, req: &UploadRequest) -> Result<(), AppError> {
        if !self.config.is_allowed_filename(&req.filename) {
            return Err(AppError::invalid_file_type(format!(
                "Invalid file type: allowed extensions are {}",
                self.config.allowed_extensions.join(", ")
            )));
        }

        if req.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::file_too_large(format!(
                "File size {} exceeds maximum {}",
                req.data.len(),
                self.config.max_upload_size_bytes
            )));
        }

        if req.data.is_empty() {
            return Err(AppError::invalid_input("File is empty"));
        }

        Ok(())
    }

    fn record_for(
        &self,
        owner_id: Uuid,
        req: &UploadRequest,
        uploaded: &UploadedObject,
    ) -> CreateMediaAsset {
        let title = match req.title.trim() {
            "" => req.filename.clone(),
            t => t.to_string(),
        };

        CreateMediaAsset {
            owner_id,
            title,
            description: req.description.trim().to_string(),
            remote_ref: uploaded.reference.clone(),
            url: uploaded.url.clone(),
            width: i32::try_from(uploaded.width).unwrap_or(i32::MAX),
            height: i32::try_from(uploaded.height).unwrap_or(i32::MAX),
            size_bytes: i64::try_from(uploaded.size_bytes).unwrap_or(i64::MAX),
            format: uploaded.format.clone(),
            tags: normalize_tags(&req.tags),
            is_public: req.is_public.unwrap_or(true),
        }
    }
}
