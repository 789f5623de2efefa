//! # gallery-entity
//!
//! Domain entity models for Gallery. Every struct in this crate represents
//! a database table row or the payload used to create or mutate one. Row
//! types derive `sqlx::FromRow`; soft-deleted rows carry a `deleted_at`
//! timestamp that is never serialized outward.

pub mod media;
pub mod post;
pub mod tags;
pub mod user;
