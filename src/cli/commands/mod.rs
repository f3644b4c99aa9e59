//! Command implementations.
//!
//! Network commands (`init`, `import`, `export` and the bare drift check)
//! share one flow: load the mapping state, resolve the API key, run the
//! startup plan, perform the action, then save once.

pub mod check;
pub mod completions;
pub mod export;
pub mod import;
pub mod init;
pub mod status;

use std::path::Path;

use colored::Colorize;
use tokio::runtime::Runtime;

use crate::api::PostmanClient;
use crate::app::{resolve_credential, App, Startup};
use crate::config::MappingState;
use crate::error::{Error, Result};
use crate::model::ResourceKind;
use crate::prompt::TerminalPrompter;
use crate::sync::ExportStats;

pub(crate) type TerminalApp = App<PostmanClient, TerminalPrompter>;

/// Whether the requested action should still run after startup.
pub(crate) enum Prepared {
    /// Run the action; `migrated` tells whether a legacy config was converted.
    Continue { migrated: bool },
    /// A bootstrap ran instead and has already been reported and saved.
    Done,
}

pub(crate) fn runtime() -> Result<Runtime> {
    Runtime::new().map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Load the project and connect to Postman.
pub(crate) fn open_app(project_dir: &Path, api_url: &str) -> Result<TerminalApp> {
    let mut state = MappingState::load(project_dir)?;
    let prompter = TerminalPrompter;
    let api_key = resolve_credential(&mut state, &prompter)?;
    let client = PostmanClient::new(api_url, &api_key)?;
    Ok(App::new(state, client, prompter))
}

/// Run the startup plan, reporting a migration or a bootstrap.
pub(crate) fn prepare(rt: &Runtime, app: &mut TerminalApp, json: bool) -> Result<Prepared> {
    match rt.block_on(app.prepare())? {
        Startup::Ready => Ok(Prepared::Continue { migrated: false }),
        Startup::Migrated => {
            if !json {
                println!("{} Migrated personal.json to postmgn.config", "✓".green());
            }
            Ok(Prepared::Continue { migrated: true })
        }
        Startup::Bootstrapped(stats) => {
            app.finish()?;
            if json {
                let output = serde_json::json!({
                    "success": true,
                    "bootstrapped": true,
                    "stats": stats,
                });
                println!("{output}");
            } else {
                println!("{}", "Started tracking:".bold());
                print_export_stats(&stats);
            }
            Ok(Prepared::Done)
        }
    }
}

pub(crate) fn print_export_stats(stats: &ExportStats) {
    for kind in ResourceKind::ALL {
        let s = stats.kind(kind);
        if s.fetched() == 0 && s.unlinked == 0 {
            continue;
        }
        let mut line = format!(
            "  {:<14} {} written, {} unchanged",
            format!("{}:", kind.plural()),
            s.written,
            s.unchanged
        );
        if s.unlinked > 0 {
            line.push_str(&format!(", {} not linked", s.unlinked));
        }
        println!("{line}");
    }
    if stats.is_empty() {
        println!("  {}", "nothing exported".dimmed());
    }
}
