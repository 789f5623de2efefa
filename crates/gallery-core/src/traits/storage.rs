//! Remote object store trait for pluggable media backends.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// What a provider reports back after accepting an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedObject {
    /// Provider-assigned identifier used for later deletes and transforms.
    pub reference: String,
    /// Publicly retrievable URL.
    pub url: String,
    /// Pixel width as measured by the provider.
    pub width: u32,
    /// Pixel height as measured by the provider.
    pub height: u32,
    /// Stored size in bytes.
    pub size_bytes: u64,
    /// Image format (`png`, `jpeg`, ...).
    pub format: String,
}

/// Parameters for a derived delivery URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Target width in pixels.
    pub width: Option<u32>,
    /// Target height in pixels.
    pub height: Option<u32>,
    /// Crop mode (`fill`, `fit`, `scale`, ...).
    pub crop: Option<String>,
}

impl TransformOptions {
    /// Whether no transformation was requested.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.crop.is_none()
    }
}

/// The remote store that holds uploaded media bytes.
///
/// Implementations live in `gallery-storage`. Every call is a single
/// attempt; failures are surfaced to the caller and never retried here.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "cloudinary").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store `data` under `folder` and report where it went.
    async fn upload(&self, data: Bytes, name: &str, folder: &str) -> AppResult<UploadedObject>;

    /// Remove a previously uploaded object.
    async fn delete(&self, reference: &str) -> AppResult<()>;

    /// Build a delivery URL for a resized or cropped rendition.
    fn transform_url(&self, reference: &str, options: &TransformOptions) -> AppResult<String>;
}
