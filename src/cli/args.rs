//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Convert between a small markdown dialect and HTML, or serve a live preview
///
/// Without a subcommand, renders INPUT (or stdin) to HTML.
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = None,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version (`-V` is taken by --verbose)
    #[arg(long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: basimark.toml)
    #[arg(short = 'C', long, global = true, default_value = "basimark.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Arguments of the default `render` command
    #[command(flatten)]
    pub render: RenderArgs,

    /// subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render markdown to HTML (the default)
    #[command(visible_alias = "html")]
    Render(RenderArgs),

    /// Restore markdown from rendered HTML
    #[command(visible_alias = "md")]
    Restore(RestoreArgs),

    /// Serve a live preview of a file
    #[command(visible_alias = "s")]
    Serve(ServeArgs),
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Markdown file to read (default: stdin)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Write HTML to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Extra short-link prefix to autolink (repeatable)
    #[arg(short = 'a', long = "autolink", value_name = "PREFIX")]
    pub autolinks: Vec<String>,
}

/// Restore command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RestoreArgs {
    /// HTML file to read (default: stdin)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Write markdown to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone)]
#[command(group = clap::ArgGroup::new("source").required(true).multiple(true).args(["file", "item"]))]
pub struct ServeArgs {
    /// File to watch (default with --item: ~/todo)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Only show the todo section headed `#ITEM`
    #[arg(short = 't', long)]
    pub item: Option<String>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Extra short-link prefix to autolink (repeatable)
    #[arg(short = 'a', long = "autolink", value_name = "PREFIX")]
    pub autolinks: Vec<String>,
}

/// Todo file used when only `--item` is given.
const DEFAULT_TODO_FILE: &str = "~/todo";

impl ServeArgs {
    /// The file to watch, with `~` expanded.
    pub fn watched_file(&self) -> PathBuf {
        let raw = match &self.file {
            Some(file) => file.to_string_lossy().into_owned(),
            None => DEFAULT_TODO_FILE.to_string(),
        };
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }
}

impl Cli {
    /// Selected command, falling back to `render`.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Render(self.render.clone()))
    }
}
