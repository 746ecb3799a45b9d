//! Slug derivation and validation shared by content entities.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and hyphens. Titles are reduced to slugs by lowercasing,
//! folding whitespace to hyphens, and dropping everything else.

/// Return `true` when `value` is a valid slug.
#[must_use]
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Derive a slug from free text such as a post title.
///
/// Returns an empty string when the input contains no usable characters;
/// callers decide how to handle that case.
///
/// # Examples
/// ```
/// use backend::domain::slug::slugify;
///
/// assert_eq!(slugify("A Home for Grace!"), "a-home-for-grace");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_hyphen = true;
        }
        // Every other character is dropped without forcing a separator.
    }
    slug
}
