//! Markdown dialect to HTML.
//!
//! The document is escaped and autolinked as a whole, then scanned line by
//! line with a single active [`LineMode`]. Leading markers that the HTML form
//! would otherwise lose (`- `, `# `, `> `) are kept inside HTML comments so
//! that [`restore`](super::restore) can put them back.

use std::borrow::Cow;

use super::{Autolinks, ConvertError, Format};
use crate::utils::html;

/// Opening container for the whole document.
const CONTAINER_OPEN: &str = "<div style=max-width:50em>";
const CONTAINER_CLOSE: &str = "</div>\n";

const BLOCKQUOTE_OPEN: &str = "<blockquote style='border-left:solid 1px;padding:0 0.5em'>";
const HEADING_OPEN: &str = "<p style=font-weight:bold>";

/// Marker prefixes as they appear after escaping.
const LIST_MARKER: &str = "- ";
const HEADING_MARKER: &str = "# ";
const QUOTE_MARKER: &str = "&gt; ";

/// Block context of the line scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    #[default]
    None,
    Blockquote,
    Paragraph,
    Preformatted,
    UnorderedList,
}

impl LineMode {
    /// Tag that ends this block.
    pub const fn closing_tag(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Blockquote => "</blockquote>",
            Self::Paragraph => "</p>",
            Self::Preformatted => "</pre>",
            Self::UnorderedList => "</li></ul>",
        }
    }
}

/// Hide a consumed marker in a comment, e.g. `<!-- - -->`.
fn hidden(marker: &str) -> String {
    format!("<!-- {marker} -->")
}

/// Render a markdown document to HTML.
///
/// Documents that already look like HTML are returned unchanged. The only
/// failure is a heading that does not start its own block.
pub fn render<'a>(input: &'a str, autolinks: &Autolinks) -> Result<Cow<'a, str>, ConvertError> {
    if Format::detect(input) == Format::Html {
        return Ok(Cow::Borrowed(input));
    }

    let escaped = html::escape(input);
    let linked = autolinks.apply(&escaped);

    let mut output = String::with_capacity(linked.len() * 2);
    output.push_str(CONTAINER_OPEN);

    let mut mode = LineMode::None;
    for (index, raw) in linked.split('\n').enumerate() {
        let mut line = Cow::Borrowed(raw);

        if raw.is_empty() {
            output.push_str(mode.closing_tag());
            mode = LineMode::None;
        } else if raw.starts_with(' ') {
            if mode == LineMode::None {
                mode = LineMode::Preformatted;
                if raw.trim().is_empty() {
                    line.to_mut().push_str("<pre>");
                } else {
                    output.push_str("<pre>");
                }
            }
        } else if let Some(rest) = raw.strip_prefix(LIST_MARKER) {
            let opened = match mode {
                LineMode::None => {
                    mode = LineMode::UnorderedList;
                    Some("<ul><li>")
                }
                LineMode::UnorderedList => Some("</li><li>"),
                _ => None,
            };
            if let Some(tag) = opened {
                output.push_str(tag);
                line = Cow::Owned(hidden("-") + rest.trim_start_matches(' '));
            }
        } else if let Some(rest) = raw.strip_prefix(HEADING_MARKER) {
            if mode != LineMode::None {
                return Err(ConvertError::MisplacedHeading {
                    line: index + 1,
                    text: raw.to_string(),
                });
            }
            line = Cow::Owned(format!("{}{HEADING_OPEN}{rest}</p>", hidden("#")));
        } else if let Some(rest) = raw.strip_prefix(QUOTE_MARKER) {
            if mode == LineMode::None {
                mode = LineMode::Blockquote;
                output.push_str(BLOCKQUOTE_OPEN);
            }
            if mode == LineMode::Blockquote {
                line = Cow::Owned(hidden("&gt;") + rest);
            }
        } else if mode == LineMode::None {
            mode = LineMode::Paragraph;
            output.push_str("<p>");
        }

        output.push_str(&line);
        output.push('\n');
    }
    output.push_str(mode.closing_tag());

    output.truncate(output.trim_end_matches('\n').len());
    output.push_str(CONTAINER_CLOSE);

    Ok(Cow::Owned(output))
}
