//! Local filesystem object store.
//!
//! Objects are written to `{root}/{folder}/{uuid}-{name}` and the relative
//! path doubles as the reference. Some static file server is expected to
//! expose `root` under `public_base_url`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use gallery_core::config::LocalStorageConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::storage::{ObjectStore, TransformOptions, UploadedObject};

use super::{clean_folder, sanitize_name};
use crate::probe::probe_image_blocking;

/// Local filesystem object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// URL prefix that maps onto `root`.
    public_base_url: String,
}

impl LocalObjectStore {
    /// Create a new local store rooted at the configured path.
    pub async fn new(config: &LocalStorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a reference to a path inside the root, rejecting traversal.
    fn resolve(&self, reference: &str) -> AppResult<PathBuf> {
        let relative = Path::new(reference.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::invalid_input(format!(
                "Invalid object reference: {reference}"
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn public_url(&self, reference: &str) -> String {
        format!("{}/{}", self.public_base_url, reference)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn upload(&self, data: Bytes, name: &str, folder: &str) -> AppResult<UploadedObject> {
        let info = probe_image_blocking(data.clone()).await?;

        let folder = clean_folder(folder);
        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_name(name));
        let reference = if folder.is_empty() {
            file_name
        } else {
            format!("{folder}/{file_name}")
        };

        let full_path = self.resolve(&reference)?;
        self.ensure_parent(&full_path).await?;
        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {reference}"),
                e,
            )
        })?;

        debug!(reference = %reference, bytes = data.len(), "Stored object");

        Ok(UploadedObject {
            url: self.public_url(&reference),
            reference,
            width: info.width,
            height: info.height,
            size_bytes: data.len() as u64,
            format: info.format,
        })
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        let full_path = self.resolve(reference)?;
        fs::remove_file(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {reference}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete object: {reference}"),
                    e,
                )
            }
        })?;
        debug!(reference, "Deleted object");
        Ok(())
    }

    fn transform_url(&self, reference: &str, options: &TransformOptions) -> AppResult<String> {
        self.resolve(reference)?;
        let mut url = self.public_url(reference);
        let mut params = Vec::new();
        if let Some(w) = options.width {
            params.push(format!("w={w}"));
        }
        if let Some(h) = options.height {
            params.push(format!("h={h}"));
        }
        if let Some(crop) = &options.crop {
            params.push(format!("c={}", sanitize_name(crop)));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        Ok(url)
    }
}
