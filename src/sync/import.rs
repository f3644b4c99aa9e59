//! Import: local wins.
//!
//! Every tracked name is read from the local store and pushed to the remote.
//! Whether a name is created or updated depends only on whether it has a
//! link in the private mapping, never on document content.
//!
//! A link whose remote resource is gone (update answers 404) is repaired by
//! creating the resource again and relinking the name to the new uid.

use tracing::{debug, info, instrument, warn};

use crate::api::ResourceClient;
use crate::config::MappingState;
use crate::error::{Error, Result};
use crate::model::{Document, ResourceKind};
use crate::sync::store::LocalStore;
use crate::sync::types::{ImportStats, KindImportStats};

/// Pushes local documents to the remote.
pub struct Importer<'a, C> {
    client: &'a C,
    store: &'a LocalStore,
}

impl<'a, C: ResourceClient> Importer<'a, C> {
    /// Create an importer reading through `store`.
    #[must_use]
    pub fn new(client: &'a C, store: &'a LocalStore) -> Self {
        Self { client, store }
    }

    /// Import every tracked name, collections first.
    ///
    /// Names are handled one at a time so a create always finishes before
    /// its uid is recorded. Only creates and relinks touch `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a tracked name with no local file,
    /// or the first remote or filesystem error. Remote changes made before
    /// the failure are not rolled back.
    pub async fn import(&self, state: &mut MappingState) -> Result<ImportStats> {
        let mut stats = ImportStats::default();
        for kind in ResourceKind::ALL {
            *stats.kind_mut(kind) = self.import_kind(state, kind).await?;
        }

        info!(
            created = stats.total_created(),
            updated = stats.total_updated(),
            "Import complete"
        );
        Ok(stats)
    }

    #[instrument(skip(self, state))]
    async fn import_kind(&self, state: &mut MappingState, kind: ResourceKind) -> Result<KindImportStats> {
        let mut stats = KindImportStats::default();
        let names = state.tracked_names(kind).to_vec();

        for name in &names {
            let doc = self.store.read(kind, name)?;

            match state.uid_for(kind, name).map(String::from) {
                Some(uid) => match self.client.update(kind, &uid, &doc).await {
                    Ok(_) => {
                        debug!(name, uid, "Updated");
                        stats.updated += 1;
                    }
                    Err(e) if e.is_remote_not_found() => {
                        warn!(name, uid, "Linked resource is gone, creating it again");
                        let new_uid = self.create(kind, &doc).await?;
                        state.record_link(kind, name, &new_uid);
                        stats.relinked += 1;
                    }
                    Err(e) => return Err(e),
                },
                None => {
                    let uid = self.create(kind, &doc).await?;
                    state.record_link(kind, name, &uid);
                    debug!(name, uid, "Created");
                    stats.created += 1;
                }
            }
        }

        Ok(stats)
    }

    async fn create(&self, kind: ResourceKind, doc: &Document) -> Result<String> {
        let created = self.client.create(kind, doc).await?;
        created
            .uid(kind)
            .map(String::from)
            .ok_or_else(|| Error::MalformedResponse {
                kind,
                operation: "create",
                message: format!("response has no `{}.uid`", kind.wrap_key()),
            })
    }
}
