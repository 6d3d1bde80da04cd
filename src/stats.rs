use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Visit counters for one scan, updated by walker workers.
///
/// Counters are atomic so final totals are exact regardless of
/// scheduling interleaving; they only ever increase until the recorder
/// is finalized into a [`ScanStats`] snapshot.
#[derive(Debug)]
pub struct StatRecorder {
    scanned_directories: AtomicU64,
    scanned_files: AtomicU64,
    ignored_directories: AtomicU64,
    ignored_files: AtomicU64,
    started: Instant,
    max_concurrency: usize,
}

impl StatRecorder {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            scanned_directories: AtomicU64::new(0),
            scanned_files: AtomicU64::new(0),
            ignored_directories: AtomicU64::new(0),
            ignored_files: AtomicU64::new(0),
            started: Instant::now(),
            max_concurrency,
        }
    }

    pub fn record_scanned_directory(&self) {
        self.scanned_directories.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scanned_file(&self) {
        self.scanned_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored_directory(&self) {
        self.ignored_directories.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored_file(&self) {
        self.ignored_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn scanned_directories(&self) -> u64 {
        self.scanned_directories.load(Ordering::Relaxed)
    }

    pub fn scanned_files(&self) -> u64 {
        self.scanned_files.load(Ordering::Relaxed)
    }

    /// Captures the final counter values and the elapsed wall time,
    /// measured from scan start until every concurrent subtree drained.
    pub fn finalize(&self) -> ScanStats {
        ScanStats {
            scanned_directories: self.scanned_directories.load(Ordering::Relaxed),
            scanned_files: self.scanned_files.load(Ordering::Relaxed),
            ignored_directories: self.ignored_directories.load(Ordering::Relaxed),
            ignored_files: self.ignored_files.load(Ordering::Relaxed),
            duration_ms: self.started.elapsed().as_millis() as u64,
            max_concurrency: self.max_concurrency as u64,
        }
    }
}

/// Immutable performance snapshot returned with every scan result.
///
/// `max_concurrency` reflects the configured worker-pool width, not a
/// live high-water mark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub scanned_directories: u64,
    pub scanned_files: u64,
    pub ignored_directories: u64,
    pub ignored_files: u64,
    pub duration_ms: u64,
    pub max_concurrency: u64,
}

impl ScanStats {
    /// Human-readable completion summary for operator logs.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "scanned {} directories and {} files, took {} ms",
            self.scanned_directories, self.scanned_files, self.duration_ms
        );
        if self.scanned_directories > 0 && self.scanned_files > 0 {
            text += &format!(
                " ({:.2} ms per directory, {:.2} ms per file)",
                self.duration_ms as f64 / self.scanned_directories as f64,
                self.duration_ms as f64 / self.scanned_files as f64
            );
        }
        if self.ignored_directories > 0 || self.ignored_files > 0 {
            text += &format!(
                ", ignored {} directories and {} files",
                self.ignored_directories, self.ignored_files
            );
        }
        text
    }
}
