//! PostgreSQL implementations of the store traits.

mod listing;
pub mod media;
pub mod post;
pub mod user;

pub use media::MediaRepository;
pub use post::PostRepository;
pub use user::UserRepository;

use gallery_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error with context.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Build a `LIKE` pattern matching `needle` anywhere, lower-cased, with
/// the wildcard characters in `needle` escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
