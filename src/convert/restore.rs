//! HTML back to the markdown dialect.
//!
//! Only documents produced by [`render`](super::render) are expected here. Tags
//! are stripped without parsing, so arbitrary HTML is not guaranteed to survive.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::Format;
use crate::utils::html;

/// `<!-- - -->` and friends: markers hidden by `render`.
static HIDDEN_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!-- ([^ ]*) -->").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n\n+").unwrap());

/// Restore the markdown source of a rendered document.
///
/// Documents that do not look like HTML are returned unchanged.
pub fn restore(input: &str) -> Cow<'_, str> {
    if Format::detect(input) != Format::Html {
        return Cow::Borrowed(input);
    }

    let unhidden = HIDDEN_MARKER.replace_all(input, "${1} ");
    let text = TAG.replace_all(&unhidden, "");

    let mut trimmed = String::with_capacity(text.len() + 1);
    trimmed.push_str(text.trim());
    trimmed.push('\n');
    let collapsed = BLANK_RUN.replace_all(&trimmed, "\n\n");

    Cow::Owned(html::unescape(&collapsed).into_owned())
}
