//! Operator prompts.
//!
//! Everything that asks the operator a question goes through [`Prompter`],
//! so reconciliation and orchestration stay testable with a scripted
//! implementation. [`TerminalPrompter`] is the interactive one.

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Password};

use crate::error::{Error, Result};
use crate::model::{RemoteResource, ResourceKind};

/// Questions postmgn may ask during a run.
pub trait Prompter {
    /// Ask for a Postman API key. An empty answer means "none".
    fn api_key(&self) -> Result<String>;

    /// Ask where documents of `kind` should be stored.
    fn document_dir(&self, kind: ResourceKind, default: &str) -> Result<String>;

    /// Let the operator pick which remote resources to track.
    fn select_resources(
        &self,
        kind: ResourceKind,
        remotes: &[RemoteResource],
    ) -> Result<Vec<RemoteResource>>;

    /// Confirm overwriting remote resources with the listed local documents.
    fn confirm_import(&self, names: &[(ResourceKind, String)]) -> Result<bool>;

    /// Show the names a teammate started tracking and ask whether to
    /// import them now.
    fn confirm_pending_import(&self, added: &[(ResourceKind, String)]) -> Result<bool>;
}

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn api_key(&self) -> Result<String> {
        if !std::io::stdin().is_terminal() {
            return Err(Error::ConfigMissing);
        }
        // https://go.postman.co/settings/me/api-keys
        let key = Password::new()
            .with_prompt("What is your Postman API key?")
            .allow_empty_password(true)
            .interact()?;
        Ok(key.trim().to_string())
    }

    fn document_dir(&self, kind: ResourceKind, default: &str) -> Result<String> {
        let dir: String = Input::new()
            .with_prompt(format!("Where do you want to save exported {}?", kind.plural()))
            .default(default.to_string())
            .interact_text()?;
        Ok(dir.trim().to_string())
    }

    fn select_resources(
        &self,
        kind: ResourceKind,
        remotes: &[RemoteResource],
    ) -> Result<Vec<RemoteResource>> {
        if remotes.is_empty() {
            return Ok(Vec::new());
        }

        let labels: Vec<String> = remotes.iter().map(choice_label).collect();
        let chosen = MultiSelect::new()
            .with_prompt(format!(
                "Please choose the {} you want to version control",
                kind.plural()
            ))
            .items(&labels)
            .interact()?;

        Ok(chosen.into_iter().map(|i| remotes[i].clone()).collect())
    }

    fn confirm_import(&self, names: &[(ResourceKind, String)]) -> Result<bool> {
        println!("You are going to import the following resources:");
        for (kind, name) in names {
            println!("  {kind}: {name}");
        }
        let confirmed = Confirm::new()
            .with_prompt("This will overwrite your Postman resources, are you sure?")
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn confirm_pending_import(&self, added: &[(ResourceKind, String)]) -> Result<bool> {
        for (kind, name) in added {
            println!("{} {kind} {} was added", "+".green(), name.bold());
        }
        let confirmed = Confirm::new()
            .with_prompt("Do you want to import now?")
            .default(true)
            .interact()?;
        Ok(confirmed)
    }
}

/// Label shown for a remote resource in the selection list.
fn choice_label(resource: &RemoteResource) -> String {
    let prefix: String = resource.id.chars().take(8).collect();
    format!("{} ({prefix})", resource.name)
}
