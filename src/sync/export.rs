//! Export: remote wins.
//!
//! Every linked tracked name is fetched from the remote and written to the
//! local store. Names without a link are skipped; they are picked up by the
//! next import.
//!
//! # Bootstrap
//!
//! A project with nothing tracked and no legacy config is bootstrapped by
//! [`bootstrap`]: the operator picks remote resources to track, each gets a
//! tracked name derived from its display name and id, and the documents are
//! exported right away.

use tracing::{debug, info, instrument};

use crate::api::ResourceClient;
use crate::config::MappingState;
use crate::error::Result;
use crate::model::{tracked_name, RemoteResource, ResourceKind};
use crate::prompt::Prompter;
use crate::sync::store::LocalStore;
use crate::sync::types::{ExportStats, KindExportStats};

/// Fetches tracked resources and writes them to the local store.
pub struct Exporter<'a, C> {
    client: &'a C,
    store: &'a LocalStore,
}

impl<'a, C: ResourceClient> Exporter<'a, C> {
    /// Create an exporter writing through `store`.
    #[must_use]
    pub fn new(client: &'a C, store: &'a LocalStore) -> Self {
        Self { client, store }
    }

    /// Export every linked tracked name.
    ///
    /// Both kinds are fetched concurrently; within a kind names are handled
    /// in list order. The mapping state is only read.
    ///
    /// # Errors
    ///
    /// Returns the first remote or filesystem error. Documents written before
    /// the failure stay on disk.
    pub async fn export(&self, state: &MappingState) -> Result<ExportStats> {
        let (collections, environments) = tokio::try_join!(
            self.export_kind(state, ResourceKind::Collection),
            self.export_kind(state, ResourceKind::Environment),
        )?;

        let stats = ExportStats {
            collections,
            environments,
        };
        info!(
            written = stats.total_written(),
            total = stats.total(),
            "Export complete"
        );
        Ok(stats)
    }

    #[instrument(skip(self, state))]
    async fn export_kind(&self, state: &MappingState, kind: ResourceKind) -> Result<KindExportStats> {
        let mut stats = KindExportStats::default();

        for name in state.tracked_names(kind) {
            let Some(uid) = state.uid_for(kind, name) else {
                debug!(name, "Skipping unlinked name");
                stats.unlinked += 1;
                continue;
            };

            let doc = self.client.get(kind, uid).await?;
            stats.record(self.store.write(kind, name, &doc)?);
        }

        Ok(stats)
    }
}

/// Establish the initial tracked lists from the operator's selection.
///
/// Lists each kind remotely, lets the operator choose, asks where documents
/// go, then links and exports every chosen resource.
///
/// # Errors
///
/// Returns the first remote, prompt or filesystem error. Links recorded
/// before the failure are only in memory.
pub async fn bootstrap<C, P>(
    client: &C,
    prompter: &P,
    state: &mut MappingState,
) -> Result<ExportStats>
where
    C: ResourceClient,
    P: Prompter + ?Sized,
{
    let mut chosen: Vec<(ResourceKind, Vec<RemoteResource>)> = Vec::new();
    for kind in ResourceKind::ALL {
        let remotes = client.list(kind).await?;
        debug!(%kind, count = remotes.len(), "Listed remote resources");
        chosen.push((kind, prompter.select_resources(kind, &remotes)?));
    }

    for kind in ResourceKind::ALL {
        let answer = prompter.document_dir(kind, kind.default_dir())?;
        let dir = if answer.is_empty() {
            kind.default_dir().to_string()
        } else {
            answer
        };
        state.set_document_dir(kind, dir);
    }

    let store = LocalStore::from_state(state);
    store.ensure_directories()?;

    let mut stats = ExportStats::default();
    for (kind, resources) in chosen {
        for resource in resources {
            let name = tracked_name(&resource);
            state.record_link(kind, &name, &resource.uid);

            let doc = client.get(kind, &resource.uid).await?;
            stats.kind_mut(kind).record(store.write(kind, &name, &doc)?);
            info!(%kind, name, "Started tracking");
        }
    }

    Ok(stats)
}
