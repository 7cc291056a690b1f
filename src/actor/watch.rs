//! Modification-time polling of the previewed file.
//!
//! Each `poll` stats the file; only when the modification time differs from
//! the last observed one is the file read, filtered and rendered.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;
use std::time::SystemTime;

use thiserror::Error;

use super::broadcast::{Snapshot, Version};
use crate::convert::{Autolinks, ConvertError, render, select_section};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot stat `{0}`")]
    Stat(PathBuf, #[source] io::Error),

    #[error("cannot read `{0}`")]
    Read(PathBuf, #[source] io::Error),

    #[error("`{0}` is not valid UTF-8")]
    Encoding(PathBuf, #[source] FromUtf8Error),

    #[error(transparent)]
    Render(#[from] ConvertError),
}

/// Produces a new snapshot whenever the watched file changes.
pub struct FileWatcher {
    path: PathBuf,
    /// Todo section to keep, if any
    item: Option<String>,
    autolinks: Autolinks,
    last_modified: Option<SystemTime>,
}

impl FileWatcher {
    pub fn new(path: impl Into<PathBuf>, autolinks: Autolinks) -> Self {
        Self {
            path: path.into(),
            item: None,
            autolinks,
            last_modified: None,
        }
    }

    /// Only render the todo section headed `#item`.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into()).filter(|item| !item.is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check the file once.
    ///
    /// Returns `Ok(None)` when the modification time is unchanged. The new
    /// modification time is recorded before reading, so a file that fails to
    /// read or render is retried only after its next change.
    pub fn poll(&mut self) -> Result<Option<Snapshot>, WatchError> {
        let modified = fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|e| WatchError::Stat(self.path.clone(), e))?;

        if self.last_modified == Some(modified) {
            return Ok(None);
        }
        self.last_modified = Some(modified);

        let bytes = fs::read(&self.path).map_err(|e| WatchError::Read(self.path.clone(), e))?;
        let text =
            String::from_utf8(bytes).map_err(|e| WatchError::Encoding(self.path.clone(), e))?;

        let text = match &self.item {
            Some(item) => Cow::Owned(select_section(&text, item)),
            None => Cow::Borrowed(text.as_str()),
        };
        let html = render(&text, &self.autolinks)?;

        Ok(Some(Snapshot::new(Version::from_mtime(modified), &html)))
    }
}
