//! Title → filesystem-safe slug.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// Slug used when a title reduces to nothing.
pub const UNTITLED: &str = "untitled-note";

/// Lower-case `text`, drop everything outside word/space/hyphen, collapse
/// runs of hyphens and whitespace into one hyphen, trim hyphens at both ends.
///
/// Unicode letters survive (`"café"` stays `"café"`); may return an empty string.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    let joined = SEPARATORS.replace_all(&kept, "-");
    joined.trim_matches('-').to_string()
}

/// [`slugify`], falling back to [`UNTITLED`] for an empty result.
pub fn slug_or_untitled(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        UNTITLED.to_string()
    } else {
        slug
    }
}
