//! # gallery-core
//!
//! Core crate for the Gallery media-sharing backend. Contains the unified
//! error system, configuration schemas, the remote object store and clock
//! capability traits, and pagination types.
//!
//! This crate has **no** internal dependencies on other Gallery crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
