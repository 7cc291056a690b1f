//! basimark - a tiny markdown dialect, its HTML form, and a live preview server.

mod actor;
mod cli;
mod config;
mod convert;
mod core;
mod embed;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{BasimarkConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(BasimarkConfig::load(&cli)?);

    match cli.command() {
        Commands::Render(args) => cli::convert::render(&args, &config),
        Commands::Restore(args) => cli::convert::restore(&args),
        Commands::Serve(args) => cli::serve::serve(&args, &config),
    }
}
