//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod path;

pub use auth::{AuthUser, MaybeAuthUser};
pub use json::ValidatedJson;
pub use pagination::PaginationParams;
pub use path::parse_uuid;
