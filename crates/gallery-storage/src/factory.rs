//! Build the configured object store.

use std::sync::Arc;

use tracing::info;

use gallery_core::config::{StorageConfig, StorageProviderKind};
use gallery_core::result::AppResult;
use gallery_core::traits::storage::ObjectStore;

use crate::providers::{LocalObjectStore, MemoryObjectStore};

/// Construct the provider named by `config.provider`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider {
        StorageProviderKind::Local => Arc::new(LocalObjectStore::new(&config.local).await?),
        StorageProviderKind::Memory => Arc::new(MemoryObjectStore::new()),
        StorageProviderKind::Cloudinary => cloudinary(config)?,
    };
    info!(
        provider = store.provider_type(),
        folder = %config.folder,
        "Object store ready"
    );
    Ok(store)
}

#[cfg(feature = "cloudinary")]
fn cloudinary(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    Ok(Arc::new(crate::providers::CloudinaryObjectStore::new(
        &config.cloudinary,
    )?))
}

#[cfg(not(feature = "cloudinary"))]
fn cloudinary(_config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    Err(gallery_core::error::AppError::configuration(
        "storage.provider = \"cloudinary\" requires the `cloudinary` feature",
    ))
}
