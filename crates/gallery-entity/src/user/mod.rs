//! User domain entities.

pub mod model;

pub use model::{CreateUser, UpdateProfile, User, normalize_email, normalize_username};
