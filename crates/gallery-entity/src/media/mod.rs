//! Media asset entities.

pub mod model;

pub use model::{CreateMediaAsset, MediaAsset, UpdateMediaAsset};
