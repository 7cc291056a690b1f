//! Autolinkification of URLs and configured short-link prefixes.
//!
//! Full `http(s)://host/path` URLs are always linked. Bare prefixes such as
//! `go` or `doc` are linked only when configured, and only when followed by
//! a slash (`go/123` becomes `<a href='http://go/123'>go/123</a>`).

use regex::Regex;

/// Alternative used when no prefix is configured. Never occurs in escaped text.
const PLACEHOLDER: &str = "__autolink_placeholder__";

/// Replacement keeping scheme, host, prefix and trailing path segment.
const REPLACEMENT: &str = "<a href='http${3}://${4}${5}/${6}'>${0}</a>";

/// Compiled autolink matcher.
///
/// Word boundaries are ASCII-only, so a link never ends on a non-ASCII
/// character.
#[derive(Debug, Clone)]
pub struct Autolinks {
    prefixes: Vec<String>,
    pattern: Regex,
}

impl Autolinks {
    /// Build a matcher from literal prefixes.
    ///
    /// Prefixes are trimmed, de-duplicated and regex-escaped; empty entries are
    /// skipped.
    pub fn new<I, S>(prefixes: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.as_ref().trim();
            if !prefix.is_empty() && !unique.iter().any(|p| p == prefix) {
                unique.push(prefix.to_string());
            }
        }

        let alternatives = if unique.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            unique
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|")
        };

        let pattern = Regex::new(&format!(
            r"(?-u:\b)((http(s)?://([-.a-z0-9]+)/?)|({alternatives})/)(\S*)?(?-u:\b)"
        ))?;

        Ok(Self {
            prefixes: unique,
            pattern,
        })
    }

    /// Matcher that links only full URLs.
    pub fn none() -> Self {
        Self::new(std::iter::empty::<&str>()).expect("placeholder autolink pattern is valid")
    }

    /// Parse the `doc|go|who` list format used by `~/.autolinks`.
    ///
    /// Entries may be separated by `|` or whitespace.
    pub fn parse_list(list: &str) -> Vec<String> {
        list.split(|c: char| c == '|' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Configured prefixes, in the order they were given.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Wrap every match in an anchor tag.
    ///
    /// Expects text that has already been HTML-escaped.
    pub fn apply<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        self.pattern.replace_all(text, REPLACEMENT)
    }
}

impl Default for Autolinks {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        let links = Autolinks::none();
        assert_eq!(
            links.apply("see https://example.com/a/b now"),
            "see <a href='https://example.com/a/b'>https://example.com/a/b</a> now"
        );
    }

    #[test]
    fn test_url_without_path() {
        let links = Autolinks::none();
        assert_eq!(
            links.apply("http://example.com"),
            "<a href='http://example.com/'>http://example.com</a>"
        );
    }

    #[test]
    fn test_trailing_punctuation_excluded() {
        let links = Autolinks::none();
        assert_eq!(
            links.apply("at http://x.org/page."),
            "at <a href='http://x.org/page'>http://x.org/page</a>."
        );
    }

    #[test]
    fn test_prefix() {
        let links = Autolinks::new(["doc", "go"]).unwrap();
        assert_eq!(
            links.apply("see go/123 now"),
            "see <a href='http://go/123'>go/123</a> now"
        );
    }

    #[test]
    fn test_prefix_not_linked_without_config() {
        let links = Autolinks::none();
        assert_eq!(links.apply("see go/123 now"), "see go/123 now");
    }

    #[test]
    fn test_word_boundaries_are_ascii() {
        let links = Autolinks::new(["go"]).unwrap();
        assert_eq!(links.apply("go/ü"), "go/ü");
        assert_eq!(
            links.apply("go/ab ü"),
            "<a href='http://go/ab'>go/ab</a> ü"
        );
    }

    #[test]
    fn test_prefix_requires_slash() {
        let links = Autolinks::new(["go"]).unwrap();
        assert_eq!(links.apply("go home"), "go home");
    }

    #[test]
    fn test_prefixes_are_literal() {
        let links = Autolinks::new(["a.b"]).unwrap();
        assert_eq!(links.apply("axb/1"), "axb/1");
        assert_eq!(
            links.apply("a.b/1"),
            "<a href='http://a.b/1'>a.b/1</a>"
        );
    }

    #[test]
    fn test_dedup_and_trim() {
        let links = Autolinks::new([" go ", "go", "", "doc"]).unwrap();
        assert_eq!(links.prefixes(), ["go", "doc"]);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            Autolinks::parse_list("doc|go|who\n"),
            vec!["doc", "go", "who"]
        );
        assert_eq!(Autolinks::parse_list("doc go\tb"), vec!["doc", "go", "b"]);
        assert!(Autolinks::parse_list("  \n").is_empty());
    }
}
