//! Concurrent tree walker and the public scanner facade.
//!
//! Each root is traversed by a bounded pool of workers; sibling
//! subtrees run in parallel with no ordering guarantee, and a failure
//! inside one subtree never cancels its siblings. Problems found along
//! the way end up in the [`ErrorLedger`]; visit counters land in the
//! [`StatRecorder`].

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{broadcast, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{validation, ScanError};
use crate::exclude::{ExclusionGate, ExclusionPolicy};
use crate::ledger::{ErrorLedger, Severity, ValidationError};
use crate::stats::{ScanStats, StatRecorder};
use crate::types::{display_path, EntryKind, ScanEvent, ScanOptions, ScanTarget, VisitedEntry};
use crate::validate::ValidatorSet;

const EVENT_CHANNEL_SIZE: usize = 256;

/// Final result of one scan: performance stats plus the ledger of
/// every recorded problem. No partial result is observable before the
/// scan has fully drained.
#[derive(Debug)]
pub struct ScanResult {
    pub stats: ScanStats,
    pub errors: ErrorLedger,
}

impl ScanResult {
    /// Accept/reject outcome for the calling layer: success, or the
    /// representative error as the single actionable cause.
    pub fn outcome(&self) -> ScanOutcome {
        match self.errors.pick_one() {
            None => ScanOutcome::Accepted,
            Some(err) => ScanOutcome::Rejected { id: err.id, message: err.message },
        }
    }
}

/// Outcome value replacing callback-style accept/reject hand-off; the
/// caller decides the side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Accepted,
    Rejected { id: String, message: String },
}

impl ScanOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanOutcome::Accepted)
    }
}

/// Public entry point wiring the walker, ledger and stat recorder.
///
/// Holds no state across scans; every `scan_*` call runs with a fresh
/// ledger and recorder and blocks until the scan completes.
pub struct Scanner {
    validators: ValidatorSet,
    policy: Arc<dyn ExclusionPolicy>,
    options: ScanOptions,
    events: broadcast::Sender<ScanEvent>,
    cancel: CancellationToken,
}

impl Scanner {
    pub fn new(
        validators: ValidatorSet,
        policy: Arc<dyn ExclusionPolicy>,
        options: ScanOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self { validators, policy, options, events, cancel: CancellationToken::new() }
    }

    /// Subscribe to the free-text reporting channel. Events are
    /// best-effort; a lagging receiver misses entries but never blocks
    /// the walk.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.events.subscribe()
    }

    /// Best-effort stop. Advisory only: workers observe the signal at
    /// directory boundaries, so counters may cover only part of the
    /// tree. The scanner instance is spent afterwards.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Scans a single root, recursively unless `recursive` is false
    /// (direct children only, no descent).
    pub async fn scan_path(
        &self,
        path: impl AsRef<Path>,
        recursive: bool,
    ) -> Result<ScanResult, ScanError> {
        self.scan_targets(vec![ScanTarget { path: path.as_ref().to_path_buf(), recursive }])
            .await
    }

    /// Scans every given root recursively.
    pub async fn scan_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ScanResult, ScanError> {
        self.scan_targets(paths.iter().map(|p| ScanTarget::new(p.as_ref())).collect()).await
    }

    /// General form: scans the given root targets and blocks until
    /// every concurrent subtree has drained.
    pub async fn scan_targets(&self, targets: Vec<ScanTarget>) -> Result<ScanResult, ScanError> {
        // Malformed input is the only synchronous failure path.
        validation::validate_targets(&targets)?;

        let width = self.options.effective_concurrency();
        let stats = Arc::new(StatRecorder::new(width));
        let ledger = Arc::new(ErrorLedger::new());

        if targets.is_empty() {
            return Ok(ScanResult {
                stats: stats.finalize(),
                errors: ErrorLedger::new(),
            });
        }

        let scan_id = Uuid::new_v4();
        let _ = self.events.send(ScanEvent::Started {
            scan_id,
            roots: targets.iter().map(|t| display_path(&t.path)).collect(),
        });
        tracing::info!(%scan_id, roots = targets.len(), concurrency = width, "scan started");

        let state = Arc::new(WalkState {
            validators: self.validators.clone(),
            gate: ExclusionGate::new(self.policy.clone(), &self.options),
            ledger: ledger.clone(),
            stats: stats.clone(),
            limit: Arc::new(Semaphore::new(width)),
            events: self.events.clone(),
            cancel: self.cancel.child_token(),
        });

        let mut roots = JoinSet::new();
        for target in targets {
            let state = state.clone();
            roots.spawn(async move {
                // Roots draw from the same permit pool as subtree
                // workers, so the configured width bounds the whole
                // scan rather than each root adding a worker on top.
                let Ok(_permit) = Arc::clone(&state.limit).acquire_owned().await else {
                    return;
                };
                state.scan_root(target).await;
            });
        }
        // Failures are isolated per root; a panicking subtree is logged
        // and its siblings keep running.
        while let Some(joined) = roots.join_next().await {
            if let Err(err) = joined {
                tracing::warn!(%scan_id, error = %err, "root scan task failed");
            }
        }

        let final_stats = stats.finalize();
        let _ = self.events.send(ScanEvent::Done { scan_id, stats: final_stats.clone() });
        tracing::info!(%scan_id, "scan completed: {}", final_stats.summary());

        drop(state);
        let errors = match Arc::try_unwrap(ledger) {
            Ok(ledger) => ledger,
            // All workers have drained, but a subscriber clone could
            // in principle outlive them; fall back to a snapshot.
            Err(shared) => ErrorLedger::from_entries(shared.entries()),
        };

        Ok(ScanResult { stats: final_stats, errors })
    }
}

/// Per-scan state shared by all walker workers. Only the ledger and
/// the stat recorder are mutated concurrently; everything else is
/// read-only.
struct WalkState {
    validators: ValidatorSet,
    gate: ExclusionGate,
    ledger: Arc<ErrorLedger>,
    stats: Arc<StatRecorder>,
    limit: Arc<Semaphore>,
    events: broadcast::Sender<ScanEvent>,
    cancel: CancellationToken,
}

impl WalkState {
    async fn scan_root(self: Arc<Self>, target: ScanTarget) {
        if self.cancel.is_cancelled() {
            return;
        }

        let meta = match tokio::fs::metadata(&target.path).await {
            Ok(meta) => meta,
            Err(err) => {
                // The root stays visible in the result: recorded and
                // counted as a visited directory rather than dropped.
                self.record_access_failure(&target.path, &err);
                self.stats.record_scanned_directory();
                return;
            }
        };

        if meta.is_dir() {
            self.scan_dir(target.path, None, target.recursive).await;
        } else {
            self.visit_file(target.path, None, Some(meta.len())).await;
        }
    }

    /// Processes one directory: gate, read, validate, then children.
    /// Boxed because subtrees recurse through spawned tasks.
    fn scan_dir(
        self: Arc<Self>,
        dir: PathBuf,
        parent: Option<PathBuf>,
        recurse: bool,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            if self.cancel.is_cancelled() {
                return;
            }

            if self.gate.check(&dir).await {
                // The whole subtree is skipped; children are never
                // individually visited or counted.
                self.stats.record_ignored_directory();
                tracing::debug!(path = %dir.display(), "directory excluded, skipping subtree");
                return;
            }

            let mut reader = match tokio::fs::read_dir(&dir).await {
                Ok(reader) => reader,
                Err(err) => {
                    self.record_access_failure(&dir, &err);
                    self.stats.record_scanned_directory();
                    return;
                }
            };

            let entry = VisitedEntry {
                path: dir.clone(),
                kind: EntryKind::Directory,
                parent: parent.clone(),
                size: None,
            };
            self.run_validators(&entry);
            self.stats.record_scanned_directory();

            let mut subdirs: Vec<PathBuf> = Vec::new();
            loop {
                let child = match reader.next_entry().await {
                    Ok(Some(child)) => child,
                    Ok(None) => break,
                    Err(err) => {
                        self.record_access_failure(&dir, &err);
                        break;
                    }
                };
                let path = child.path();
                let meta = match child.metadata().await {
                    Ok(meta) => meta,
                    Err(err) => {
                        // Kind unknown; record it and count the entry
                        // as a visited file so it is not dropped.
                        self.record_access_failure(&path, &err);
                        self.stats.record_scanned_file();
                        continue;
                    }
                };
                if meta.is_dir() {
                    subdirs.push(path);
                } else {
                    self.visit_file(path, Some(dir.clone()), Some(meta.len())).await;
                }
            }

            let _ = self.events.send(ScanEvent::Progress {
                current_path: display_path(&dir),
                dirs_scanned: self.stats.scanned_directories(),
                files_scanned: self.stats.scanned_files(),
            });

            if !recurse {
                // Non-recursive roots: child directories are neither
                // entered nor counted.
                return;
            }

            let mut children = JoinSet::new();
            for sub in subdirs {
                if self.cancel.is_cancelled() {
                    break;
                }
                // Fan-out is capped by the pool width: hand the
                // subtree to a new worker when a permit is free,
                // otherwise keep the current worker on it.
                match Arc::clone(&self.limit).try_acquire_owned() {
                    Ok(permit) => {
                        let state = self.clone();
                        let parent = dir.clone();
                        children.spawn(async move {
                            let _permit = permit;
                            state.scan_dir(sub, Some(parent), true).await;
                        });
                    }
                    Err(_) => {
                        self.clone().scan_dir(sub, Some(dir.clone()), true).await;
                    }
                }
            }
            while let Some(joined) = children.join_next().await {
                if let Err(err) = joined {
                    tracing::warn!(
                        parent = %dir.display(),
                        error = %err,
                        "subtree task failed, continuing with siblings"
                    );
                }
            }
        })
    }

    async fn visit_file(&self, path: PathBuf, parent: Option<PathBuf>, size: Option<u64>) {
        if self.gate.check(&path).await {
            self.stats.record_ignored_file();
            tracing::debug!(path = %path.display(), "file excluded");
            return;
        }

        let entry = VisitedEntry { path, kind: EntryKind::File, parent, size };
        self.run_validators(&entry);
        self.stats.record_scanned_file();
    }

    fn run_validators(&self, entry: &VisitedEntry) {
        for violation in self.validators.run(entry) {
            let _ = self.events.send(ScanEvent::Violation {
                path: display_path(&violation.path),
                code: violation.id.clone(),
                message: violation.message.clone(),
                severity: violation.severity,
            });
            self.ledger.append(violation);
        }
    }

    /// Records a filesystem failure without aborting the walk.
    fn record_access_failure(&self, path: &Path, err: &std::io::Error) {
        let (code, message) = match err.kind() {
            ErrorKind::NotFound => ("not_found", "path not found".to_string()),
            ErrorKind::PermissionDenied => ("permission_denied", "permission denied".to_string()),
            _ => ("io_error", format!("I/O error: {}", err)),
        };
        let _ = self.events.send(ScanEvent::Warning {
            path: display_path(path),
            code: code.to_string(),
            message: message.clone(),
        });
        self.ledger.append(ValidationError::new(code, message, Severity::Error, path));
    }
}
