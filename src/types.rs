use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::Severity;
use crate::stats::ScanStats;

/// Kind of a filesystem entry seen during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// A caller-supplied scan root. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTarget {
    pub path: PathBuf,
    pub recursive: bool,
}

impl ScanTarget {
    /// Root that is traversed recursively.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), recursive: true }
    }

    /// Root whose direct children are visited without any descent.
    pub fn shallow(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), recursive: false }
    }
}

/// One traversal step, handed to validators and discarded afterwards.
#[derive(Debug, Clone)]
pub struct VisitedEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub parent: Option<PathBuf>,
    /// File size from metadata; `None` for directories.
    pub size: Option<u64>,
}

impl VisitedEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }
}

/// Tunables for one scanner instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Worker-pool width; `None` derives it from the CPU count.
    pub concurrency: Option<usize>,
    /// Upper bound for a single exclusion-policy lookup.
    pub policy_timeout_ms: u64,
    /// When false the exclusion gate never calls the policy.
    pub check_excluded: bool,
    /// Lighter policy check used during time-sensitive bundle ingestion.
    pub skip_queue_check: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: None,
            policy_timeout_ms: 5000,
            check_excluded: true,
            skip_queue_check: false,
        }
    }
}

impl ScanOptions {
    /// Resolved worker-pool width: configured value, or 75% of the CPU
    /// cores with a floor of two.
    pub fn effective_concurrency(&self) -> usize {
        let optimal = (num_cpus::get() * 3 / 4).max(2);
        self.concurrency.unwrap_or(optimal).max(1)
    }
}

/// Events published on the scanner's broadcast channel. This is the
/// free-text reporting side channel; the structured record of the same
/// problems lives in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanEvent {
    Started {
        scan_id: Uuid,
        roots: Vec<String>,
    },
    /// A validator flagged an entry.
    Violation {
        path: String,
        code: String,
        message: String,
        severity: Severity,
    },
    /// An underlying filesystem operation failed; the walk continued.
    Warning {
        path: String,
        code: String,
        message: String,
    },
    Progress {
        current_path: String,
        dirs_scanned: u64,
        files_scanned: u64,
    },
    Done {
        scan_id: Uuid,
        stats: ScanStats,
    },
}

/// Renders a path for events and log lines.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
