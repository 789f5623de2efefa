//! In-process object store.
//!
//! Keeps uploaded bytes in a map and records every delete attempt, so tests
//! can assert exactly how many remote deletes an operation issued. Uploads
//! and deletes can be switched to fail.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::storage::{ObjectStore, TransformOptions, UploadedObject};

use super::{clean_folder, sanitize_name};
use crate::probe::probe_image_blocking;

const BASE_URL: &str = "memory://objects";

/// Memory-backed [`ObjectStore`] with failure injection.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    delete_attempts: Mutex<Vec<String>>,
    upload_attempts: AtomicUsize,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent delete fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of upload calls, successful or not.
    pub fn upload_attempts(&self) -> usize {
        self.upload_attempts.load(Ordering::SeqCst)
    }

    /// References passed to `delete`, in call order, successful or not.
    pub fn delete_attempts(&self) -> Vec<String> {
        self.delete_attempts
            .lock()
            .map(|d| d.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Whether an object is currently stored under `reference`.
    pub fn contains(&self, reference: &str) -> bool {
        self.objects
            .lock()
            .map(|o| o.contains_key(reference))
            .unwrap_or(false)
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    fn lock_objects(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, Bytes>>> {
        self.objects
            .lock()
            .map_err(|_| AppError::internal("Object map lock poisoned"))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn upload(&self, data: Bytes, name: &str, folder: &str) -> AppResult<UploadedObject> {
        self.upload_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::storage("Simulated upload failure"));
        }

        let info = probe_image_blocking(data.clone()).await?;
        let folder = clean_folder(folder);
        let reference = format!("{folder}/{}-{}", Uuid::new_v4(), sanitize_name(name));
        let size_bytes = data.len() as u64;
        self.lock_objects()?.insert(reference.clone(), data);

        Ok(UploadedObject {
            url: format!("{BASE_URL}/{reference}"),
            reference,
            width: info.width,
            height: info.height,
            size_bytes,
            format: info.format,
        })
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        if let Ok(mut attempts) = self.delete_attempts.lock() {
            attempts.push(reference.to_string());
        }
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage("Simulated delete failure"));
        }
        match self.lock_objects()?.remove(reference) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!("Object not found: {reference}"))),
        }
    }

    fn transform_url(&self, reference: &str, options: &TransformOptions) -> AppResult<String> {
        let width = options.width.map(|w| w.to_string()).unwrap_or_default();
        let height = options.height.map(|h| h.to_string()).unwrap_or_default();
        let crop = options.crop.as_deref().unwrap_or("");
        Ok(format!("{BASE_URL}/w{width}_h{height}_c{crop}/{reference}"))
    }
}
