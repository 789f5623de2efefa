//! Posts grouping a user's media assets.

pub mod service;

pub use service::{CreatePostRequest, PostService};
