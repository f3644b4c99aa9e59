//! Import command implementation.

use std::path::Path;

use colored::Colorize;

use crate::cli::commands::{open_app, prepare, runtime, Prepared};
use crate::error::Result;
use crate::model::ResourceKind;
use crate::sync::ImportStats;

/// Push every tracked document to Postman.
///
/// Declining the confirmation sends nothing to Postman. Config changes
/// made before the question, such as a prompted API key, are still saved.
///
/// # Errors
///
/// Returns an error if a tracked document has no local file, the API key
/// is missing, or any create or update fails.
pub fn execute(project_dir: &Path, api_url: &str, yes: bool, json: bool) -> Result<()> {
    let rt = runtime()?;
    let mut app = open_app(project_dir, api_url)?;

    let Prepared::Continue { migrated } = prepare(&rt, &mut app, json)? else {
        return Ok(());
    };

    let Some(stats) = rt.block_on(app.import(yes))? else {
        app.finish()?;
        if json {
            println!("{}", serde_json::json!({"success": false, "declined": true}));
        } else {
            println!("Import cancelled.");
        }
        return Ok(());
    };
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
        println!("{}", "Import complete".bold());
        print_import_stats(&stats);
    }

    Ok(())
}

pub(crate) fn print_import_stats(stats: &ImportStats) {
    for kind in ResourceKind::ALL {
        let s = stats.kind(kind);
        if s.total() == 0 {
            continue;
        }
        let mut line = format!(
            "  {:<14} {} updated, {} created",
            format!("{}:", kind.plural()),
            s.updated,
            s.created
        );
        if s.relinked > 0 {
            line.push_str(&format!(", {} {}", s.relinked, "relinked".yellow()));
        }
        println!("{line}");
    }
    if stats.total_processed() == 0 {
        println!("  {}", "nothing to import".dimmed());
    }
}
