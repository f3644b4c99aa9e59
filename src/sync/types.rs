//! Sync result types.

use serde::Serialize;

use crate::model::ResourceKind;

/// What happened to a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The file was created or its content replaced.
    Written,
    /// The file already held identical content.
    Unchanged,
}

/// Per-kind statistics for an export.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct KindExportStats {
    /// Documents written with new content.
    pub written: usize,
    /// Documents fetched whose content did not change.
    pub unchanged: usize,
    /// Tracked names skipped because they are not linked to a remote uid.
    pub unlinked: usize,
}

impl KindExportStats {
    /// Record one write outcome.
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.written += 1,
            WriteOutcome::Unchanged => self.unchanged += 1,
        }
    }

    /// Documents fetched from the remote.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.written + self.unchanged
    }
}

/// Statistics for an export operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    /// Collection statistics.
    pub collections: KindExportStats,
    /// Environment statistics.
    pub environments: KindExportStats,
}

impl ExportStats {
    /// Statistics for one kind.
    #[must_use]
    pub fn kind(&self, kind: ResourceKind) -> &KindExportStats {
        match kind {
            ResourceKind::Collection => &self.collections,
            ResourceKind::Environment => &self.environments,
        }
    }

    /// Mutable statistics for one kind.
    pub fn kind_mut(&mut self, kind: ResourceKind) -> &mut KindExportStats {
        match kind {
            ResourceKind::Collection => &mut self.collections,
            ResourceKind::Environment => &mut self.environments,
        }
    }

    /// Total documents fetched.
    #[must_use]
    pub fn total(&self) -> usize {
        self.collections.fetched() + self.environments.fetched()
    }

    /// Total documents whose file changed.
    #[must_use]
    pub fn total_written(&self) -> usize {
        self.collections.written + self.environments.written
    }

    /// Returns true if nothing was fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Per-kind statistics for an import.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct KindImportStats {
    /// Remote resources created for unlinked names.
    pub created: usize,
    /// Remote resources overwritten.
    pub updated: usize,
    /// Names whose stale uid was replaced by a newly created resource.
    pub relinked: usize,
}

impl KindImportStats {
    /// Total names processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.relinked
    }
}

/// Statistics for an import operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Collection statistics.
    pub collections: KindImportStats,
    /// Environment statistics.
    pub environments: KindImportStats,
}

impl ImportStats {
    /// Mutable statistics for one kind.
    pub fn kind_mut(&mut self, kind: ResourceKind) -> &mut KindImportStats {
        match kind {
            ResourceKind::Collection => &mut self.collections,
            ResourceKind::Environment => &mut self.environments,
        }
    }

    /// Statistics for one kind.
    #[must_use]
    pub fn kind(&self, kind: ResourceKind) -> &KindImportStats {
        match kind {
            ResourceKind::Collection => &self.collections,
            ResourceKind::Environment => &self.environments,
        }
    }

    /// Total names processed.
    #[must_use]
    pub fn total_processed(&self) -> usize {
        self.collections.total() + self.environments.total()
    }

    /// Total remote resources created (including relinks).
    #[must_use]
    pub fn total_created(&self) -> usize {
        self.collections.created
            + self.environments.created
            + self.collections.relinked
            + self.environments.relinked
    }

    /// Total remote resources updated.
    #[must_use]
    pub fn total_updated(&self) -> usize {
        self.collections.updated + self.environments.updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_stats_totals() {
        let mut stats = ExportStats::default();
        stats.kind_mut(ResourceKind::Collection).record(WriteOutcome::Written);
        stats.kind_mut(ResourceKind::Environment).record(WriteOutcome::Unchanged);
        stats.kind_mut(ResourceKind::Environment).unlinked += 1;

        assert_eq!(stats.total(), 2);
        assert_eq!(stats.total_written(), 1);
        assert!(!stats.is_empty());
    }

    #[test]
    fn test_import_stats_totals() {
        let mut stats = ImportStats::default();
        stats.kind_mut(ResourceKind::Collection).created = 1;
        stats.kind_mut(ResourceKind::Collection).relinked = 1;
        stats.kind_mut(ResourceKind::Environment).updated = 2;

        assert_eq!(stats.total_processed(), 4);
        assert_eq!(stats.total_created(), 2);
        assert_eq!(stats.total_updated(), 2);
    }
}
