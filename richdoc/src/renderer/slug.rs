//! Heading slug allocation
//!
//! Turns heading text into URL-safe identifiers, de-duplicated within one
//! render pass by counting occurrences of the original heading text.

use super::context::HeadingCounter;

/// Base used when a heading normalizes to an empty slug (e.g. "!!!" or "")
pub const FALLBACK_SLUG: &str = "section";

/// Normalize text into a slug
///
/// Lower-cases the text, replaces every run of characters outside `[a-z0-9]`
/// with a single hyphen and trims hyphens at both ends.
///
/// # Examples
///
/// ```
/// use richdoc::renderer::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("  What's new in v2.0?  "), "what-s-new-in-v2-0");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Identifier for the `occurrence`-th heading (1-indexed) with this text
///
/// The first occurrence carries the bare slug, later ones get `-{occurrence}`.
pub fn heading_id(text: &str, occurrence: usize) -> String {
    let mut base = slugify(text);
    if base.is_empty() {
        base = FALLBACK_SLUG.to_string();
    }

    if occurrence > 1 {
        format!("{}-{}", base, occurrence)
    } else {
        base
    }
}

/// Allocate the next identifier for `text`, recording the occurrence in `counter`
///
/// Occurrences are tracked by the text as written, not by its slug, so two
/// different texts that normalize identically both receive the bare slug.
pub fn allocate(text: &str, counter: &mut HeadingCounter) -> String {
    let occurrence = counter.record(text);
    heading_id(text, occurrence)
}
