//! Object store provider implementations.

#[cfg(feature = "cloudinary")]
pub mod cloudinary;
pub mod local;
pub mod memory;

#[cfg(feature = "cloudinary")]
pub use cloudinary::CloudinaryObjectStore;
pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`, never empty.
pub(crate) fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Strip separators from a folder and reject traversal.
pub(crate) fn clean_folder(folder: &str) -> String {
    folder
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
        .map(sanitize_name)
        .collect::<Vec<_>>()
        .join("/")
}
