//! Status command implementation.
//!
//! Works offline: it neither resolves the API key nor runs the startup plan.

use std::path::Path;

use crate::config::MappingState;
use crate::error::Result;
use crate::sync::{get_tracking_status, print_status, LocalStore};

/// Show tracked names, their links and untracked local files.
///
/// # Errors
///
/// Returns an error if a config file is malformed or a document directory
/// cannot be listed.
pub fn execute(project_dir: &Path, json: bool) -> Result<()> {
    let state = MappingState::load(project_dir)?;
    let store = LocalStore::from_state(&state);
    let status = get_tracking_status(&state, &store)?;

    if json {
        println!("{}", serde_json::to_string(&status)?);
    } else {
        print_status(&status);
    }

    Ok(())
}
