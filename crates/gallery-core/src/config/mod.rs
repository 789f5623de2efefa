//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. The merged [`AppConfig`] is built once at start-up and handed
//! to component constructors; nothing below the binary reads the
//! environment directly.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, MAX_TOKEN_TTL_HOURS};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::{CloudinaryConfig, LocalStorageConfig, StorageConfig, StorageProviderKind};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Remote object store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `GALLERY__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GALLERY")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("storage.allowed_extensions")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check the settings that the server cannot run without.
    ///
    /// A missing signing secret is fatal; there is no fallback value.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.jwt_secret must be set (GALLERY__AUTH__JWT_SECRET)",
            ));
        }
        if self.auth.token_ttl_hours == 0 || self.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(AppError::configuration(format!(
                "auth.token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}"
            )));
        }
        if self.storage.max_upload_size_bytes == 0 {
            return Err(AppError::configuration(
                "storage.max_upload_size_bytes must be greater than zero",
            ));
        }
        if self.storage.allowed_extensions.is_empty() {
            return Err(AppError::configuration(
                "storage.allowed_extensions must not be empty",
            ));
        }
        if self.storage.provider == StorageProviderKind::Cloudinary {
            self.storage.cloudinary.validate()?;
        }
        Ok(())
    }
}
