//! Cloudinary object store.
//!
//! Uses the signed upload API: every request carries the API key, a unix
//! timestamp, and a SHA-256 signature over the sorted parameters followed
//! by the API secret.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use gallery_core::config::CloudinaryConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::storage::{ObjectStore, TransformOptions, UploadedObject};

use super::{clean_folder, sanitize_name};

/// Cloudinary-backed [`ObjectStore`].
#[derive(Debug, Clone)]
pub struct CloudinaryObjectStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    bytes: u64,
    #[serde(default)]
    format: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryObjectStore {
    /// Create a client for the configured account.
    pub fn new(config: &CloudinaryConfig) -> AppResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    fn signed_params(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.retain(|(_, v)| !v.is_empty());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        params.push(("timestamp", timestamp));
        let signature = sign(&params, &self.config.api_secret);
        params.push(("api_key", self.config.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        params
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => format!("{status}: {}", body.error.message),
            Err(_) => status.to_string(),
        }
    }
}

/// Signature over `params` sorted by name, `k=v` joined with `&`, then the secret.
pub(crate) fn sign(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ObjectStore for CloudinaryObjectStore {
    fn provider_type(&self) -> &str {
        "cloudinary"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let response = self
            .client
            .get(self.config.api_base_url.as_str())
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Cloudinary unreachable", e))?;
        Ok(!response.status().is_server_error())
    }

    async fn upload(&self, data: Bytes, name: &str, folder: &str) -> AppResult<UploadedObject> {
        let params = self.signed_params(vec![("folder", clean_folder(folder))]);
        let file = Part::stream(data).file_name(sanitize_name(name));
        let form = params
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v))
            .part("file", file);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Cloudinary upload request failed", e))?;

        if !response.status().is_success() {
            let message = Self::error_message(response).await;
            return Err(AppError::storage(format!("Cloudinary rejected upload: {message}")));
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Malformed Cloudinary upload response", e)
        })?;

        debug!(public_id = %body.public_id, bytes = body.bytes, "Uploaded to Cloudinary");

        Ok(UploadedObject {
            reference: body.public_id,
            url: body.secure_url,
            width: body.width,
            height: body.height,
            size_bytes: body.bytes,
            format: body.format,
        })
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        let params = self.signed_params(vec![("public_id", reference.to_string())]);
        let form = params
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v));

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Cloudinary destroy request failed", e))?;

        if !response.status().is_success() {
            let message = Self::error_message(response).await;
            return Err(AppError::storage(format!("Cloudinary rejected delete: {message}")));
        }

        let body: DestroyResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Malformed Cloudinary destroy response", e)
        })?;

        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => Err(AppError::not_found(format!("Object not found: {reference}"))),
            other => Err(AppError::storage(format!("Cloudinary destroy returned '{other}'"))),
        }
    }

    fn transform_url(&self, reference: &str, options: &TransformOptions) -> AppResult<String> {
        let mut segments = Vec::new();
        if let Some(w) = options.width {
            segments.push(format!("w_{w}"));
        }
        if let Some(h) = options.height {
            segments.push(format!("h_{h}"));
        }
        if let Some(crop) = &options.crop {
            segments.push(format!("c_{}", sanitize_name(crop)));
        }
        let base = format!(
            "{}/{}/image/upload",
            self.config.delivery_base_url.trim_end_matches('/'),
            self.config.cloud_name
        );
        Ok(if segments.is_empty() {
            format!("{base}/{reference}")
        } else {
            format!("{base}/{}/{reference}", segments.join(","))
        })
    }
}
