//! Tag-name parsing.
//!
//! The API accepts tags as a single whitespace-separated string
//! (`"rust web backend"`). The store only ever sees a list of names.

/// Split a raw tags string on runs of whitespace.
///
/// An empty or whitespace-only input yields an empty list; callers use that
/// to omit the tags field from store payloads entirely, so "no tags supplied"
/// and "empty tag list" stay distinguishable.
pub fn parse_tag_names(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
