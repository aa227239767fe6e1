//! Comma grouping.

/// Split a selector on commas into trimmed, non-empty groups.
///
/// The split is purely textual: a comma inside quotes or a pseudo-class
/// argument still separates groups.
pub fn split_groups(selector: &str) -> Vec<&str> {
    selector
        .split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .collect()
}
