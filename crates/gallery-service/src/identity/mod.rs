//! Identity lifecycle: registration, login, profile, password, deactivation.

pub mod service;

pub use service::{AuthSession, IdentityService, RegisterRequest};
