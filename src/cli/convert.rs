//! `render` and `restore` commands.
//!
//! Both read one document (file or stdin) and write the converted document
//! (file or stdout). Nothing is written when conversion fails.

use std::borrow::Cow;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::{RenderArgs, RestoreArgs};
use crate::config::BasimarkConfig;
use crate::convert;

/// Render markdown to HTML.
pub fn render(args: &RenderArgs, config: &BasimarkConfig) -> Result<()> {
    let autolinks = config.convert.autolinks(&args.autolinks)?;
    crate::debug!("convert"; "autolink prefixes: {:?}", autolinks.prefixes());

    let input = read_input(args.input.as_deref())?;
    let html = convert::render(&input, &autolinks)
        .with_context(|| format!("Failed to render {}", display_name(args.input.as_deref())))?;
    write_output(args.output.as_deref(), &html)
}

/// Restore markdown from rendered HTML.
pub fn restore(args: &RestoreArgs) -> Result<()> {
    let input = read_input(args.input.as_deref())?;
    let markdown = convert::restore(&input);
    if matches!(markdown, Cow::Borrowed(_)) {
        crate::debug!("convert"; "input is not HTML, passing through");
    }
    write_output(args.output.as_deref(), &markdown)
}

/// Read the whole input. `None` and `-` mean stdin.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Write the whole output. `None` and `-` mean stdout.
fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write stdout")
        }
    }
}

fn display_name(path: Option<&Path>) -> Cow<'_, str> {
    match path {
        Some(path) => path.to_string_lossy(),
        None => Cow::Borrowed("stdin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config() -> BasimarkConfig {
        test_parse_config("[convert]\nautolinks = [\"go\"]\nautolinks_file = \"\"")
    }

    #[test]
    fn test_render_file_to_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("notes.md");
        let output = temp.path().join("notes.html");
        fs::write(&input, "# Title\n\nsee go/x\n").unwrap();

        let args = RenderArgs {
            input: Some(input),
            output: Some(output.clone()),
            autolinks: Vec::new(),
        };
        render(&args, &config()).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<div style=max-width:50em><!-- # -->"));
        assert!(html.contains("<a href='http://go/x'>go/x</a>"));
    }

    #[test]
    fn test_render_error_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("bad.md");
        let output = temp.path().join("bad.html");
        fs::write(&input, "text\n# heading\n").unwrap();

        let args = RenderArgs {
            input: Some(input),
            output: Some(output.clone()),
            autolinks: Vec::new(),
        };
        let err = render(&args, &config()).unwrap_err();

        assert!(format!("{err:#}").contains("line 2: # must be starting its own paragraph"));
        assert!(!output.exists());
    }

    #[test]
    fn test_restore_file_to_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("notes.html");
        let output = temp.path().join("notes.md");
        fs::write(
            &input,
            "<div style=max-width:50em><ul><li><!-- - -->a &amp; b\n</li></ul></div>\n",
        )
        .unwrap();

        let args = RestoreArgs {
            input: Some(input),
            output: Some(output.clone()),
        };
        restore(&args).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "- a & b\n");
    }

    #[test]
    fn test_missing_input_file() {
        let args = RestoreArgs {
            input: Some(PathBuf::from("/nonexistent/basimark/input.html")),
            output: None,
        };
        let err = restore(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(None), "stdin");
        assert_eq!(display_name(Some(Path::new("a.md"))), "a.md");
    }
}
