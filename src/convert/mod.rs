//! Conversion between the markdown dialect and HTML.
//!
//! # Module Structure
//!
//! - `render` - markdown to HTML line scanner
//! - `restore` - HTML back to markdown
//! - `autolink` - URL and short-link prefix linkification
//! - `section` - todo-list section selection
//!
//! # Supported dialect
//!
//! | Line starts with  | Block           |
//! |-------------------|-----------------|
//! | (blank)           | ends the block  |
//! | a space           | `<pre>`         |
//! | `- `              | `<ul><li>`      |
//! | `# `              | bold paragraph  |
//! | `> `              | `<blockquote>`  |
//! | anything else     | `<p>`           |
//!
//! Both directions pass documents through untouched when they are already in
//! the target format.

mod autolink;
mod render;
mod restore;
mod section;


pub use autolink::Autolinks;
pub use render::render;
pub use restore::restore;
pub use section::select_section;

use thiserror::Error;

/// Document format, decided by the first byte only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Markdown,
}

impl Format {
    pub fn detect(document: &str) -> Self {
        if document.starts_with('<') {
            Self::Html
        } else {
            Self::Markdown
        }
    }
}

/// Defects in the input document. Not recoverable by retrying.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("line {line}: # must be starting its own paragraph: {text}")]
    MisplacedHeading { line: usize, text: String },
}
