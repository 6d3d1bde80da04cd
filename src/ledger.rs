use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Severity of a recorded problem. `Error` orders above `Warning` so
/// `pick_one` can prefer the more actionable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One structural violation or access failure discovered during a scan.
/// Owned exclusively by the ledger; lives for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub path: PathBuf,
}

impl ValidationError {
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self { id: id.into(), message: message.into(), severity, path: path.into() }
    }
}

/// A single actionable reason handed to callers that reject a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeError {
    pub id: String,
    pub message: String,
}

/// Append-only collection of problems for one scan. Thread-safe under
/// concurrent walker workers; read-only once the scan has drained.
///
/// Insertion order under concurrency is not reproducible, so all read
/// operations work on a copy sorted by `(path, id)`.
#[derive(Debug, Default)]
pub struct ErrorLedger {
    entries: Mutex<Vec<ValidationError>>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from an entry snapshot.
    pub fn from_entries(entries: Vec<ValidationError>) -> Self {
        Self { entries: Mutex::new(entries) }
    }

    // A worker that panicked mid-append leaves usable data behind, so
    // poisoning is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Vec<ValidationError>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn append(&self, error: ValidationError) {
        self.lock().push(error);
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Snapshot of all recorded entries in deterministic `(path, id)`
    /// order.
    pub fn entries(&self) -> Vec<ValidationError> {
        let mut out = self.lock().clone();
        out.sort_by(|a, b| (&a.path, &a.id).cmp(&(&b.path, &b.id)));
        out
    }

    /// All recorded messages joined into one human-readable diagnostic,
    /// sorted by `(path, id)`.
    pub fn format(&self) -> String {
        self.entries()
            .iter()
            .map(|e| format!("{} ({})", e.message, e.path.display()))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The representative error: highest severity first, ties broken by
    /// `(path, id)` order. `None` when the ledger is empty.
    pub fn pick_one(&self) -> Option<RepresentativeError> {
        self.lock()
            .iter()
            .min_by(|a, b| {
                b.severity
                    .cmp(&a.severity)
                    .then_with(|| (&a.path, &a.id).cmp(&(&b.path, &b.id)))
            })
            .map(|e| RepresentativeError { id: e.id.clone(), message: e.message.clone() })
    }

    /// Whether any entry was recorded for the given path.
    pub fn contains_path(&self, path: &Path) -> bool {
        self.lock().iter().any(|e| e.path == path)
    }
}
