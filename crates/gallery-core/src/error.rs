//! Unified application error types for Gallery.
//!
//! Every crate maps its internal failures into [`AppError`] so that the
//! `?` operator works across layer boundaries. Business failures are
//! created by the component that detects them and travel to the HTTP
//! boundary with their [`ErrorKind`] intact; infrastructure failures are
//! wrapped with context via [`AppError::with_source`].

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource does not exist (or is not visible to the caller).
    NotFound,
    /// The caller is authenticated but does not own the resource.
    Forbidden,
    /// Missing, malformed, or expired bearer token.
    Unauthorized,
    /// The request shape or field values are invalid.
    InvalidInput,
    /// Registration attempted with an email already in use.
    EmailExists,
    /// Registration attempted with a username already in use.
    UsernameExists,
    /// Unknown email or wrong password. Never says which.
    InvalidCredentials,
    /// The uploaded file name does not carry an allowed image extension.
    InvalidFileType,
    /// The uploaded payload exceeds the configured ceiling.
    FileTooLarge,
    /// The remote object store rejected or failed the upload.
    UploadFailed,
    /// A database error occurred.
    Database,
    /// A storage I/O or remote object store error occurred.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An unclassified internal failure.
    Internal,
}

impl ErrorKind {
    /// Whether this kind is a business outcome rather than an infrastructure fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Database | Self::Storage | Self::Configuration | Self::Serialization | Self::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::InvalidInput => write!(f, "INVALID_INPUT"),
            Self::EmailExists => write!(f, "EMAIL_EXISTS"),
            Self::UsernameExists => write!(f, "USERNAME_EXISTS"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::InvalidFileType => write!(f, "INVALID_FILE_TYPE"),
            Self::FileTooLarge => write!(f, "FILE_TOO_LARGE"),
            Self::UploadFailed => write!(f, "UPLOAD_FAILED"),
            Self::Database => write!(f, "DATABASE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Gallery.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Create an email-exists error.
    pub fn email_exists() -> Self {
        Self::new(ErrorKind::EmailExists, "Email already exists")
    }

    /// Create a username-exists error.
    pub fn username_exists() -> Self {
        Self::new(ErrorKind::UsernameExists, "Username already exists")
    }

    /// Create the single invalid-credentials error returned for any login failure.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid email or password")
    }

    /// Create an invalid-file-type error.
    pub fn invalid_file_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFileType, message)
    }

    /// Create a file-too-large error.
    pub fn file_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileTooLarge, message)
    }

    /// Create an upload-failed error.
    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UploadFailed, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
