//! # gallery-database
//!
//! Persistence for Gallery. The services depend only on the capability
//! traits in [`store`]; this crate ships a PostgreSQL implementation of
//! each (in [`repositories`]) and an in-process [`memory::MemoryStore`]
//! used by tests and by the server when no database is wanted.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{MediaStore, PostStore, UserStore};
