//! Drift detection and tracking status.
//!
//! Everything here is read-only: it compares the shared tracked lists with
//! the private mapping (and, for status, with the files on disk) and never
//! touches the network.

use std::collections::BTreeMap;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::config::MappingState;
use crate::error::Result;
use crate::model::ResourceKind;
use crate::sync::store::LocalStore;

/// What a run has to do before its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPlan {
    /// Names are tracked; proceed with the requested action.
    Ready,
    /// Nothing tracked yet but a legacy config exists.
    MigrateLegacy,
    /// Nothing tracked and nothing to migrate: first-time export.
    Bootstrap,
}

/// Decide what must happen before the requested action runs.
#[must_use]
pub fn startup_plan(state: &MappingState) -> StartupPlan {
    if !state.is_untracked() {
        StartupPlan::Ready
    } else if state.has_legacy() {
        StartupPlan::MigrateLegacy
    } else {
        StartupPlan::Bootstrap
    }
}

/// Tracked names with no uid in `mapping`, in list order.
#[must_use]
pub fn added_names<'a>(tracked: &'a [String], mapping: &BTreeMap<String, String>) -> Vec<&'a str> {
    tracked
        .iter()
        .filter(|name| mapping.get(*name).is_none_or(String::is_empty))
        .map(String::as_str)
        .collect()
}

/// Whether any tracked name lacks a mapping entry.
#[must_use]
pub fn needs_import(tracked: &[String], mapping: &BTreeMap<String, String>) -> bool {
    !added_names(tracked, mapping).is_empty()
}

/// Names tracked in the shared lists but not linked locally.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    /// Unlinked names, collections first, each kind in list order.
    pub added: Vec<(ResourceKind, String)>,
}

impl DriftReport {
    /// True when at least one name has to be imported.
    #[must_use]
    pub fn needs_import(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Compare every tracked list with its mapping.
#[must_use]
pub fn detect_drift(state: &MappingState) -> DriftReport {
    let mut report = DriftReport::default();
    for kind in ResourceKind::ALL {
        for name in added_names(state.tracked_names(kind), state.mapping(kind)) {
            info!(%kind, name, "Tracked name is not linked");
            report.added.push((kind, name.to_string()));
        }
    }
    report
}

/// One tracked name and what is known about it locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedEntry {
    /// Tracked name.
    pub name: String,
    /// Linked remote uid, if any.
    pub uid: Option<String>,
    /// Whether the document file exists.
    pub has_document: bool,
}

/// Status of one kind.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct KindStatus {
    /// Document directory, relative to the project root.
    pub dir: String,
    /// Tracked names in list order.
    pub tracked: Vec<TrackedEntry>,
    /// Document files on disk that are not tracked.
    pub untracked_files: Vec<String>,
}

/// Tracking status of a project.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStatus {
    /// Collection status.
    pub collections: KindStatus,
    /// Environment status.
    pub environments: KindStatus,
    /// Whether a legacy `personal.json` is present.
    pub has_legacy: bool,
}

impl TrackingStatus {
    /// Status of one kind.
    #[must_use]
    pub fn kind(&self, kind: ResourceKind) -> &KindStatus {
        match kind {
            ResourceKind::Collection => &self.collections,
            ResourceKind::Environment => &self.environments,
        }
    }
}

/// Build the tracking status of a project.
///
/// # Errors
///
/// Returns an error if a document directory cannot be listed.
pub fn get_tracking_status(state: &MappingState, store: &LocalStore) -> Result<TrackingStatus> {
    let mut status = TrackingStatus {
        has_legacy: state.has_legacy(),
        ..TrackingStatus::default()
    };

    for kind in ResourceKind::ALL {
        let on_disk = store.list(kind)?;
        let tracked = state.tracked_names(kind);

        let entry = KindStatus {
            dir: state.document_dir(kind).to_string(),
            tracked: tracked
                .iter()
                .map(|name| TrackedEntry {
                    name: name.clone(),
                    uid: state.uid_for(kind, name).map(String::from),
                    has_document: on_disk.contains(name),
                })
                .collect(),
            untracked_files: on_disk
                .into_iter()
                .filter(|name| !tracked.contains(name))
                .collect(),
        };

        match kind {
            ResourceKind::Collection => status.collections = entry,
            ResourceKind::Environment => status.environments = entry,
        }
    }

    Ok(status)
}

/// Print tracking status in human-readable form.
pub fn print_status(status: &TrackingStatus) {
    println!("{}", "Tracking Status".bold().underline());
    println!();

    for kind in ResourceKind::ALL {
        let entry = status.kind(kind);
        println!(
            "{} {}",
            format!("{}:", capitalize(kind.plural())).blue().bold(),
            format!("({}/)", entry.dir).dimmed()
        );

        if entry.tracked.is_empty() {
            println!("  {}", "none tracked".dimmed());
        }
        for tracked in &entry.tracked {
            let link = if tracked.uid.is_some() {
                "linked".green()
            } else {
                "not linked".yellow()
            };
            let file = if tracked.has_document {
                String::new()
            } else {
                format!(" {}", "(no local file)".red())
            };
            println!("  {}  {link}{file}", tracked.name);
        }
        for name in &entry.untracked_files {
            println!("  {}  {}", name.dimmed(), "untracked".dimmed());
        }
        println!();
    }

    if status.has_legacy {
        println!("{}", "A legacy personal.json is present.".dimmed());
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
