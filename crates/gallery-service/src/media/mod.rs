//! Media assets: upload orchestration and ownership-gated access.

pub mod service;
pub mod upload;

pub use service::MediaService;
pub use upload::{UploadRequest, UploadService, UploadStage};
