//! HTML entity escaping.
//!
//! Provides the two directions the converter needs:
//! - `escape()` - replace the five HTML metacharacters with entities
//! - `unescape()` - turn exactly those five entities back into characters

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Entities produced by `escape()`, in the order `unescape()` must undo them.
///
/// `&amp;` comes last so that an escaped entity such as `&amp;lt;` decodes to
/// the literal text `&lt;` instead of `<`.
const ENTITIES: [(&str, &str); 5] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#039;", "'"),
    ("&amp;", "&"),
];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#039;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape the entities produced by `escape()`.
///
/// Other entities (`&nbsp;`, numeric references) are left untouched: the
/// converter never produces them, so decoding them would not be an inverse.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = s.to_string();
    for (entity, ch) in ENTITIES {
        if result.contains(entity) {
            result = result.replace(entity, ch);
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Tests
// =============================================================================
