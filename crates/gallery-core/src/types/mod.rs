//! Core type definitions used across the Gallery workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
