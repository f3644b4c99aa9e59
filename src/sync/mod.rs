//! Reconciliation between Postman and the project directory.
//!
//! - **Export**: linked remote resources → local documents (remote wins)
//! - **Import**: local documents → remote resources (local wins), creating
//!   and linking names that have no uid yet
//! - **Bootstrap**: first export, driven by the operator's selection
//! - **Status**: drift detection and an offline view of what is tracked
//!
//! # Architecture
//!
//! Three sources meet here: the remote listing, the private name → uid
//! mapping, and the shared ordered list of tracked names. The exporter and
//! importer are generic over [`ResourceClient`](crate::api::ResourceClient)
//! and only mutate the [`MappingState`](crate::config::MappingState) they are
//! handed; persisting it is the caller's job, once per action.
//!
//! # Example
//!
//! ```ignore
//! use postmgn::sync::{Exporter, Importer, LocalStore};
//!
//! let store = LocalStore::from_state(&state);
//! let stats = Exporter::new(&client, &store).export(&state).await?;
//! let stats = Importer::new(&client, &store).import(&mut state).await?;
//! state.save()?;
//! ```

mod export;
mod file;
mod hash;
mod import;
mod status;
mod store;
mod types;

pub use export::{bootstrap, Exporter};
pub use file::{atomic_write, atomic_write_private, read_json_if_exists, to_pretty_json};
pub use hash::{content_hash, has_changed};
pub use import::Importer;
pub use status::{
    added_names, detect_drift, get_tracking_status, needs_import, print_status, startup_plan,
    DriftReport, KindStatus, StartupPlan, TrackedEntry, TrackingStatus,
};
pub use store::LocalStore;
pub use types::{ExportStats, ImportStats, KindExportStats, KindImportStats, WriteOutcome};
