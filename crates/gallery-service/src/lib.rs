//! # gallery-service
//!
//! Business logic service layer for Gallery. Each service orchestrates the
//! store traits, the remote object store, and the auth primitives to
//! implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references, so the same service runs
//! against PostgreSQL in production and the in-memory stores in tests.

pub mod context;
pub mod identity;
pub mod media;
pub mod post;
pub mod views;

pub use context::RequestContext;
pub use identity::{AuthSession, IdentityService, RegisterRequest};
pub use media::{MediaService, UploadRequest, UploadService, UploadStage};
pub use post::{CreatePostRequest, PostService};
pub use views::ViewCounter;
