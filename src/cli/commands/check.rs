//! Default command: look for names a teammate started tracking.

use std::path::Path;

use colored::Colorize;

use crate::cli::commands::import::print_import_stats;
use crate::cli::commands::{open_app, prepare, runtime, Prepared};
use crate::error::Result;

/// Report drift and offer to import it.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded, the API key is
/// missing, or the offered import fails.
pub fn execute(project_dir: &Path, api_url: &str, json: bool) -> Result<()> {
    let rt = runtime()?;
    let mut app = open_app(project_dir, api_url)?;

    let Prepared::Continue { migrated } = prepare(&rt, &mut app, json)? else {
        return Ok(());
    };

    let outcome = rt.block_on(app.check())?;
    let saved = app.finish()?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "migrated": migrated,
            "saved": saved,
            "needs_import": outcome.drift.needs_import(),
            "added": outcome.drift.added,
            "imported": outcome.imported,
        });
        println!("{output}");
    } else if !outcome.drift.needs_import() {
        println!("{} Everything tracked is linked.", "✓".green());
    } else if let Some(stats) = &outcome.imported {
        println!("{}", "Import complete".bold());
        print_import_stats(stats);
    } else {
        println!("Run `postmgn import` when you are ready.");
    }

    Ok(())
}
