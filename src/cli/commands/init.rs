//! Set up postmgn in a project directory.
//!
//! Init resolves the API key (prompting and saving it when needed), runs the
//! startup plan so an empty project is migrated or bootstrapped, and makes
//! sure both document directories exist.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::commands::{open_app, prepare, runtime, Prepared};
use crate::config::{PRIVATE_FILE, PUBLIC_FILE};
use crate::error::Result;
use crate::model::ResourceKind;

#[derive(Serialize)]
struct InitOutput {
    success: bool,
    migrated: bool,
    saved: bool,
    collection_path: String,
    environment_path: String,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the API key is missing, bootstrapping fails, or the
/// directories or config files cannot be written.
pub fn execute(project_dir: &Path, api_url: &str, json: bool) -> Result<()> {
    let rt = runtime()?;
    let mut app = open_app(project_dir, api_url)?;

    let Prepared::Continue { migrated } = prepare(&rt, &mut app, json)? else {
        return Ok(());
    };

    app.store().ensure_directories()?;
    let saved = app.finish()?;

    let state = app.state();
    if json {
        let output = InitOutput {
            success: true,
            migrated,
            saved,
            collection_path: state.document_dir(ResourceKind::Collection).to_string(),
            environment_path: state.document_dir(ResourceKind::Environment).to_string(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "{} postmgn is set up in {}",
            "✓".green(),
            state.root().display()
        );
        for kind in ResourceKind::ALL {
            println!("  {:<14} {}/", format!("{}:", kind.plural()), state.document_dir(kind));
        }
        if saved {
            println!();
            println!("Commit {PUBLIC_FILE}; {PRIVATE_FILE} stays out of git.");
        }
    }

    Ok(())
}
