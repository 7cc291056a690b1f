//! `[convert]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [convert]
//! autolinks = ["doc", "go"]           # Short-link prefixes linked as http://go/...
//! autolinks_file = "~/.autolinks"     # Extra prefixes, `doc|go|who` format
//! ```
//!
//! Prefixes are merged in order: this section, then the file, then
//! `--autolink` flags. Duplicates are dropped.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::convert::Autolinks;

/// Converter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Short-link prefixes.
    pub autolinks: Vec<String>,

    /// File with more prefixes. A missing file is not an error.
    pub autolinks_file: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            autolinks: Vec::new(),
            autolinks_file: Some(PathBuf::from("~/.autolinks")),
        }
    }
}

impl ConvertConfig {
    /// Prefixes listed in `autolinks_file`. A missing or unreadable file
    /// contributes nothing.
    pub fn file_prefixes(&self) -> Vec<String> {
        // `autolinks_file = ""` disables the lookup
        let Some(path) = self
            .autolinks_file
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
        else {
            return Vec::new();
        };
        let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());

        match fs::read_to_string(&path) {
            Ok(content) => Autolinks::parse_list(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                crate::debug!("convert"; "no autolinks file at {}", path.display());
                Vec::new()
            }
            Err(e) => {
                crate::log!("warning"; "ignoring autolinks file {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Build the autolink matcher from config, file and `extra` prefixes.
    pub fn autolinks(&self, extra: &[String]) -> Result<Autolinks> {
        let file = self.file_prefixes();
        let prefixes = self.autolinks.iter().chain(&file).chain(extra);
        Autolinks::new(prefixes).context("Failed to build autolink pattern")
    }
}
