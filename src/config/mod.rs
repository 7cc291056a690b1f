//! Configuration management for `basimark.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── convert    # [convert]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # BasimarkConfig (this file)
//! ```
//!
//! The file is optional: without it every section takes its defaults.
//! Command-line options are applied on top of whatever was loaded.

pub mod section;
pub mod types;

pub use section::{ConvertConfig, ServeConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing basimark.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasimarkConfig {
    /// Path of the config file, whether or not it exists (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Converter settings
    #[serde(default)]
    pub convert: ConvertConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl BasimarkConfig {
    /// Load configuration for the given command line.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if cli.config.exists() {
            Self::from_path(&cli.config)?
        } else {
            crate::debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.config_path = cli.config.clone();
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match cli.command() {
            Commands::Serve(args) => {
                Self::update_option(&mut self.serve.interface, args.interface.as_ref());
                Self::update_option(&mut self.serve.port, args.port.as_ref());
            }
            // Autolink flags are merged when the matcher is built
            Commands::Render(_) | Commands::Restore(_) => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        self.serve.validate(&mut problems);

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("; ")))
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BasimarkConfig {
    let (parsed, ignored) = BasimarkConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
