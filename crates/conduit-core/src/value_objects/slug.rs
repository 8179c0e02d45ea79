//! Slug derivation for article titles and tag names

use crate::error::DomainError;

/// Longest title slug; the rename suffix still fits within the slug column
pub const MAX_SLUG_LEN: usize = 300;

/// Longest slug stored for a tag
pub const MAX_TAG_SLUG_LEN: usize = 64;

/// Derive the canonical slug of an article title.
///
/// The slug is lowercase ASCII with every run of non-alphanumeric characters
/// collapsed to a single `-`. Titles that reduce to nothing (only punctuation
/// or whitespace) are rejected. Transliteration can make the slug much longer
/// than the title, so it is cut back to [`MAX_SLUG_LEN`] at a word boundary.
pub fn slugify_title(title: &str) -> Result<String, DomainError> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        return Err(DomainError::ValidationError(
            "Title must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(truncate_at_word(slug, MAX_SLUG_LEN))
}

/// Slug used when an existing article is renamed: the title slug followed by
/// a millisecond timestamp so the new slug does not collide with the old one.
pub fn suffixed_slug(title: &str, unix_millis: i64) -> Result<String, DomainError> {
    Ok(format!("{}-{unix_millis}", slugify_title(title)?))
}

/// Slug stored alongside a newly created tag
pub fn tag_slug(name: &str) -> String {
    truncate_at_word(slug::slugify(name), MAX_TAG_SLUG_LEN)
}

// Slugs are ASCII, so every byte offset is a char boundary.
fn truncate_at_word(slug: String, max: usize) -> String {
    if slug.len() <= max {
        return slug;
    }
    let cut = if slug.as_bytes()[max] == b'-' {
        max
    } else {
        slug[..max].rfind('-').unwrap_or(max)
    };
    slug[..cut].trim_end_matches('-').to_string()
}
