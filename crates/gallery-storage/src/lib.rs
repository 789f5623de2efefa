//! # gallery-storage
//!
//! Remote object store providers for Gallery. Each provider implements
//! [`gallery_core::traits::ObjectStore`]; [`factory::build_object_store`]
//! picks one from configuration at start-up.

pub mod factory;
pub mod probe;
pub mod providers;

pub use factory::build_object_store;
pub use providers::{LocalObjectStore, MemoryObjectStore};
#[cfg(feature = "cloudinary")]
pub use providers::CloudinaryObjectStore;
