//! Keeps the private config out of version control.
//!
//! The private config carries the API key, so it must be listed in the
//! project's `.gitignore` before it is ever written.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Name of the ignore file, relative to the project root.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Whether `content` already has a line ignoring exactly `entry`.
///
/// A leading `/` (anchored to the repository root) counts as a match.
#[must_use]
pub fn is_ignored(content: &str, entry: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .any(|line| line == entry || line.strip_prefix('/') == Some(entry))
}

/// Ensure `<root>/.gitignore` lists `entry`, appending it when missing.
///
/// Returns `true` when the file was modified.
///
/// # Errors
///
/// Returns [`Error::IgnoreFile`] if the ignore file cannot be read or
/// appended to. Callers must not write the private file in that case.
pub fn ensure_ignored(root: &Path, entry: &str) -> Result<bool> {
    let path = root.join(GITIGNORE_FILE);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            warn!(path = %path.display(), error = %source, "Failed to read ignore file");
            return Err(Error::IgnoreFile { path, source });
        }
    };

    if is_ignored(&content, entry) {
        return Ok(false);
    }

    let mut line = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        line.push('\n');
    }
    line.push_str(entry);
    line.push('\n');

    let appended = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut file| file.write_all(line.as_bytes()));

    match appended {
        Ok(()) => {
            info!(entry, path = %path.display(), "Appended to ignore file");
            Ok(true)
        }
        Err(source) => {
            warn!(path = %path.display(), error = %source, "Failed to update ignore file");
            Err(Error::IgnoreFile { path, source })
        }
    }
}
