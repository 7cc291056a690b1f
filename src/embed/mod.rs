//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Preview server pages (preview.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{PREVIEW_HTML, PreviewVars};
//!
//! let html = PREVIEW_HTML.render(&PreviewVars { title: "todo".into() });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::utils::html;

    /// Variables for preview.html.
    pub struct PreviewVars {
        /// Shown as the page title, usually the watched file name
        pub title: String,
    }

    impl TemplateVars for PreviewVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TITLE__", &html::escape(&self.title))
                .replace("__VERSION__", env!("CARGO_PKG_VERSION"))
        }
    }

    /// Live preview page. Long-polls `/content` and swaps in each new rendering.
    pub const PREVIEW_HTML: Template<PreviewVars> =
        Template::new(include_str!("serve/preview.html"));
}
