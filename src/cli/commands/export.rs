//! Export command implementation.

use std::path::Path;

use colored::Colorize;

use crate::cli::commands::{open_app, prepare, print_export_stats, runtime, Prepared};
use crate::error::Result;

/// Pull every linked resource into the project directory.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded, the API key is
/// missing, or any fetch or write fails.
pub fn execute(project_dir: &Path, api_url: &str, json: bool) -> Result<()> {
    let rt = runtime()?;
    let mut app = open_app(project_dir, api_url)?;

    let Prepared::Continue { migrated } = prepare(&rt, &mut app, json)? else {
        return Ok(());
    };

    let stats = rt.block_on(app.export())?;
    let saved = app.finish()?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "migrated": migrated,
            "saved": saved,
            "stats": stats,
        });
        println!("{output}");
    } else {
        println!("{}", "Export complete".bold());
        print_export_stats(&stats);
    }

    Ok(())
}
