//! Comma-separated tag strings.
//!
//! Tags are stored as a single string (`"sunset, beach"`). Matching is
//! case-insensitive substring matching over that string, so a query tag of
//! `sun` matches an asset tagged `sunset`.

/// Split a tag string into trimmed, non-empty tags, dropping duplicates
/// (case-insensitive) while keeping first-seen order.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut tags = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let lowered = tag.to_lowercase();
        if !seen.contains(&lowered) {
            seen.push(lowered);
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Normalize a tag string into its canonical `"a, b, c"` form.
pub fn normalize_tags(raw: &str) -> String {
    parse_tags(raw).join(", ")
}

/// Whether `haystack` contains every tag in `wanted` (case-insensitive substring).
pub fn matches_all_tags(haystack: &str, wanted: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    wanted
        .iter()
        .all(|tag| haystack.contains(&tag.to_lowercase()))
}

/// Whether any of `fields` contains `query` (case-insensitive substring).
pub fn matches_query(fields: &[&str], query: &str) -> bool {
    let query = query.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&query))
}
