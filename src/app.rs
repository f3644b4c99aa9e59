//! Orchestration of one postmgn action.
//!
//! An [`App`] owns the loaded [`MappingState`] for the duration of a run and
//! hands it by reference to the reconciler. Actions only mutate it in
//! memory; [`App::finish`] persists it once at the end.

use tracing::{debug, info};

use crate::api::ResourceClient;
use crate::config::{MappingState, API_KEY_ENV};
use crate::error::{Error, Result};
use crate::model::ResourceKind;
use crate::prompt::Prompter;
use crate::sync::{
    bootstrap, detect_drift, startup_plan, DriftReport, ExportStats, Exporter, ImportStats,
    Importer, LocalStore, StartupPlan,
};

/// Find the API key, prompting when neither the environment nor a config
/// file has one.
///
/// A prompted key is stored in `state` and saved right away, so it
/// survives a run that ends before [`App::finish`].
///
/// # Errors
///
/// Returns [`Error::ConfigMissing`] if the operator enters nothing, a
/// prompt error if the terminal cannot be used, or a save error.
pub fn resolve_credential<P: Prompter + ?Sized>(
    state: &mut MappingState,
    prompter: &P,
) -> Result<String> {
    credential_from(std::env::var(API_KEY_ENV).ok(), state, prompter)
}

fn credential_from<P: Prompter + ?Sized>(
    from_env: Option<String>,
    state: &mut MappingState,
    prompter: &P,
) -> Result<String> {
    let stored = state.api_key().or_else(|| state.legacy_api_key());
    if let Some(key) = crate::config::pick_api_key(from_env, stored) {
        return Ok(key);
    }

    let key = prompter.api_key()?.trim().to_string();
    if key.is_empty() {
        return Err(Error::ConfigMissing);
    }
    state.set_api_key(key.clone());
    state.save()?;
    debug!("Stored prompted API key in private config");
    Ok(key)
}

/// What happened before the requested action could run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// Names were already tracked.
    Ready,
    /// A legacy config was converted and saved.
    Migrated,
    /// Nothing was tracked; the first export ran instead of the action.
    Bootstrapped(ExportStats),
}

/// Result of the default drift check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Names tracked by the team but not linked here.
    pub drift: DriftReport,
    /// Import statistics, when an import ran.
    pub imported: Option<ImportStats>,
}

/// One run against one project.
pub struct App<C, P> {
    state: MappingState,
    client: C,
    prompter: P,
}

impl<C: ResourceClient, P: Prompter> App<C, P> {
    /// Create an app around already-loaded state.
    pub fn new(state: MappingState, client: C, prompter: P) -> Self {
        Self {
            state,
            client,
            prompter,
        }
    }

    /// Loaded mapping state.
    #[must_use]
    pub fn state(&self) -> &MappingState {
        &self.state
    }

    /// Store for the configured document directories.
    #[must_use]
    pub fn store(&self) -> LocalStore {
        LocalStore::from_state(&self.state)
    }

    /// Migrate or bootstrap an empty project.
    ///
    /// A migration is saved right away since it is a one-way upgrade. A
    /// legacy config that tracked nothing continues into a bootstrap. After
    /// a bootstrap the caller should skip its action.
    ///
    /// # Errors
    ///
    /// Returns an error if migration is ambiguous, or if bootstrapping fails.
    pub async fn prepare(&mut self) -> Result<Startup> {
        match startup_plan(&self.state) {
            StartupPlan::Ready => Ok(Startup::Ready),
            StartupPlan::MigrateLegacy => {
                self.state.migrate_legacy()?;
                self.state.save()?;
                info!("Migrated legacy config");
                if self.state.is_untracked() {
                    info!("Legacy config tracked nothing, starting first export");
                    return self.bootstrap().await;
                }
                Ok(Startup::Migrated)
            }
            StartupPlan::Bootstrap => {
                info!("Nothing tracked yet, starting first export");
                self.bootstrap().await
            }
        }
    }

    async fn bootstrap(&mut self) -> Result<Startup> {
        let stats = bootstrap(&self.client, &self.prompter, &mut self.state).await?;
        Ok(Startup::Bootstrapped(stats))
    }

    /// Pull every linked resource.
    ///
    /// # Errors
    ///
    /// Returns the first remote or filesystem error.
    pub async fn export(&self) -> Result<ExportStats> {
        let store = self.store();
        Exporter::new(&self.client, &store).export(&self.state).await
    }

    /// Push every tracked document.
    ///
    /// Unless `assume_yes`, the operator confirms first; `None` means they
    /// declined and nothing was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if a tracked document is missing locally, or on the
    /// first remote or prompt error.
    pub async fn import(&mut self, assume_yes: bool) -> Result<Option<ImportStats>> {
        if !assume_yes {
            let names: Vec<(ResourceKind, String)> = ResourceKind::ALL
                .into_iter()
                .flat_map(|kind| {
                    self.state
                        .tracked_names(kind)
                        .iter()
                        .map(move |name| (kind, name.clone()))
                })
                .collect();
            if !self.prompter.confirm_import(&names)? {
                info!("Import declined");
                return Ok(None);
            }
        }

        let store = self.store();
        let stats = Importer::new(&self.client, &store)
            .import(&mut self.state)
            .await?;
        Ok(Some(stats))
    }

    /// Report drift and offer to import it.
    ///
    /// Drift is detected once; the prompter shows the added names before
    /// asking.
    ///
    /// # Errors
    ///
    /// Returns an error if the import fails or a prompt cannot be shown.
    pub async fn check(&mut self) -> Result<CheckOutcome> {
        let drift = detect_drift(&self.state);
        if !drift.needs_import() {
            return Ok(CheckOutcome {
                drift,
                imported: None,
            });
        }

        let imported = if self.prompter.confirm_pending_import(&drift.added)? {
            self.import(false).await?
        } else {
            None
        };
        Ok(CheckOutcome { drift, imported })
    }

    /// Persist mapping state if the run changed it.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the ignore file or a config file cannot be written.
    pub fn finish(&mut self) -> Result<bool> {
        if !self.state.is_dirty() {
            return Ok(false);
        }
        self.state.save()?;
        Ok(true)
    }
}
