//! Summaries of multi-step engine operations

use std::path::PathBuf;

use crate::models::Snapshot;

use super::copy::CopyStats;

/// Result of restoring a snapshot into a profile's source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// The snapshot that was restored
    pub snapshot: Snapshot,
    /// Directory that was replaced
    pub target: PathBuf,
    /// Files and directories removed from the target before copying
    pub removed_entries: usize,
    /// What was copied back
    pub copied: CopyStats,
}

impl RestoreReport {
    /// One-line summary for display
    pub fn summary(&self) -> String {
        format!(
            "Restored '{}' into {}: removed {} entries, copied {} files in {} directories ({} bytes)",
            self.snapshot.display_name,
            self.target.display(),
            self.removed_entries,
            self.copied.files,
            self.copied.directories,
            self.copied.bytes
        )
    }
}

/// A snapshot folder the cascade could not remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeFailure {
    pub folder_name: String,
    pub reason: String,
}

/// Result of deleting every snapshot of a profile
///
/// Removal is best-effort: one failed folder never stops the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Folders that were removed
    pub removed: Vec<String>,
    /// Folders that were already gone
    pub missing: Vec<String>,
    /// Folders (or index cleanup) that failed
    pub failures: Vec<CascadeFailure>,
}

impl CascadeReport {
    /// Whether everything was cleaned up
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, folder_name: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(CascadeFailure {
            folder_name: folder_name.into(),
            reason: reason.into(),
        });
    }

    /// One-line summary for display
    pub fn summary(&self) -> String {
        let mut summary = format!("removed {} snapshot(s)", self.removed.len());
        if !self.missing.is_empty() {
            summary.push_str(&format!(", {} already gone", self.missing.len()));
        }
        if !self.failures.is_empty() {
            let folders: Vec<&str> = self.failures.iter().map(|f| f.folder_name.as_str()).collect();
            summary.push_str(&format!(", {} failed ({})", self.failures.len(), folders.join(", ")));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_summary() {
        let mut report = CascadeReport::default();
        report.removed.push("2025-01-01_000000".into());
        assert!(report.is_clean());
        assert_eq!(report.summary(), "removed 1 snapshot(s)");

        report.fail("2025-01-02_000000", "permission denied");
        assert!(!report.is_clean());
        assert_eq!(
            report.summary(),
            "removed 1 snapshot(s), 1 failed (2025-01-02_000000)"
        );
    }
}
