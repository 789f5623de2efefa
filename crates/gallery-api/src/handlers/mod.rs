//! Route handlers organized by domain.

pub mod auth;
pub mod health;
pub mod media;
pub mod post;
pub mod user;
