//! # gallery-auth
//!
//! Credential handling and authorization primitives for Gallery.
//!
//! ## Modules
//!
//! - `jwt` — signed, time-bounded identity tokens (issue and verify)
//! - `password` — Argon2id password hashing and policy enforcement
//! - `guard` — the ownership check run before every mutation

pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::OwnershipGuard;
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
