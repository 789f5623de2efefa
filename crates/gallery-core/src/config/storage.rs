//! Remote object store configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which remote object store backs media uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// Files on local disk served under a public base URL.
    #[default]
    Local,
    /// Cloudinary's signed upload API.
    Cloudinary,
    /// In-process map; nothing survives a restart.
    Memory,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider used for uploads, deletes, and transform URLs.
    #[serde(default)]
    pub provider: StorageProviderKind,
    /// Folder (namespace) uploads are placed under.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Maximum upload size in bytes (default 100 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Lower-case file extensions (without the dot) accepted for upload.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Local filesystem provider settings.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// Cloudinary provider settings.
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::default(),
            folder: default_folder(),
            max_upload_size_bytes: default_max_upload(),
            allowed_extensions: default_allowed_extensions(),
            local: LocalStorageConfig::default(),
            cloudinary: CloudinaryConfig::default(),
        }
    }
}

impl StorageConfig {
    /// Whether `filename` ends in one of the allowed extensions (case-insensitive).
    pub fn is_allowed_filename(&self, filename: &str) -> bool {
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for stored objects.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// Base URL under which `root_path` is publicly served.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// Cloudinary account configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    /// Cloud name (account identifier in API URLs).
    #[serde(default)]
    pub cloud_name: String,
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret used to sign requests.
    #[serde(default)]
    pub api_secret: String,
    /// API base URL.
    #[serde(default = "default_cloudinary_api")]
    pub api_base_url: String,
    /// Delivery base URL for transformed images.
    #[serde(default = "default_cloudinary_delivery")]
    pub delivery_base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_cloudinary_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base_url: default_cloudinary_api(),
            delivery_base_url: default_cloudinary_delivery(),
            timeout_seconds: default_cloudinary_timeout(),
        }
    }
}

impl CloudinaryConfig {
    /// Fail if any credential is missing.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(AppError::configuration(
                "storage.cloudinary requires cloud_name, api_key and api_secret",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("api_base_url", &self.api_base_url)
            .field("delivery_base_url", &self.delivery_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn default_folder() -> String {
    "images".to_string()
}

fn default_max_upload() -> u64 {
    100 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp", "bmp"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_local_root() -> String {
    "./data/media".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/media".to_string()
}

fn default_cloudinary_api() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_cloudinary_delivery() -> String {
    "https://res.cloudinary.com".to_string()
}

fn default_cloudinary_timeout() -> u64 {
    60
}
