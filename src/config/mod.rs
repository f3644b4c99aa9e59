//! Configuration management.
//!
//! This module owns everything postmgn persists besides the documents
//! themselves, and resolves the values a run needs before it can start.
//!
//! # Architecture
//!
//! - **Public config** (`postmgn.config`): committed, shared by the team
//! - **Private config** (`postmgn.private.config`): ignored, per developer
//! - **Legacy config** (`personal.json`): read-only migration source
//!
//! All three live in the project directory (the working directory unless
//! `--project-dir` / `POSTMGN_DIR` says otherwise).

mod gitignore;
mod mapping;

pub use gitignore::{ensure_ignored, is_ignored, GITIGNORE_FILE};
pub use mapping::{
    LegacyConfig, MappingState, PrivateConfig, PublicConfig, LEGACY_FILE, PRIVATE_FILE, PUBLIC_FILE,
};

/// Environment variable holding the Postman API key.
pub const API_KEY_ENV: &str = "POSTMAN_API_KEY";

/// Pick the API key a run should use.
///
/// Priority:
/// 1. `POSTMAN_API_KEY` environment variable
/// 2. `apiKey` in the private config
///
/// Blank values are skipped. Returns `None` when neither is set; the caller
/// decides whether to prompt.
#[must_use]
pub fn pick_api_key(from_env: Option<String>, stored: Option<&str>) -> Option<String> {
    if let Some(key) = from_env {
        let key = key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }

    stored
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
}
