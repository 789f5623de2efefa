//! # gallery-api
//!
//! HTTP API layer for Gallery built on Axum.
//!
//! Provides the REST endpoints, bearer-token extractors, request logging
//! and CORS middleware, DTOs, and the mapping from [`AppError`] kinds to
//! HTTP status codes.
//!
//! [`AppError`]: gallery_core::error::AppError

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::{AppState, Stores};
