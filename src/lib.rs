//! # ReleaseWarden
//!
//! Concurrent, policy-driven filesystem tree scanner that validates
//! media-release bundles (directories or single files) before they are
//! admitted into a managed archive.
//!
//! ## Architecture
//!
//! The crate is built using:
//! - **Tokio**: async runtime; directory listing, policy lookups and
//!   metadata reads are suspension points, subtree fan-out is bounded
//!   by a semaphore worker pool
//! - **Tracing**: structured logging throughout
//! - **Config**: layered configuration (embedded defaults, optional
//!   file, environment)
//!
//! ## Core Components
//!
//! - [`config`]: configuration loading and validation
//! - [`error`]: error types and synchronous input validation
//! - [`exclude`]: asynchronous exclusion policy and fail-closed gate
//! - [`ledger`]: structured, append-only error ledger for one scan
//! - [`rules`]: bundled rule validators (extension and size checks)
//! - [`scanner`]: concurrent tree walker and the scanner facade
//! - [`stats`]: atomic visit counters and the final stats snapshot
//! - [`types`]: scan targets, visited entries, options and events
//! - [`validate`]: validator contract and the pipeline orchestrator
//!
//! ## Behavior
//!
//! - Every reachable, non-excluded entry is visited exactly once
//! - Per-entry failures are recorded, never fatal: sibling subtrees
//!   keep running
//! - Exclusion-policy failures and timeouts resolve fail-closed
//! - Results are deterministic: the ledger reads back in `(path, id)`
//!   order regardless of worker interleaving

pub mod config;
pub mod error;
pub mod exclude;
pub mod ledger;
pub mod rules;
pub mod scanner;
pub mod stats;
pub mod types;
pub mod validate;

pub use error::ScanError;
pub use exclude::{ExclusionGate, ExclusionPolicy, GlobExclusionPolicy, NoExclusions};
pub use ledger::{ErrorLedger, RepresentativeError, Severity, ValidationError};
pub use scanner::{ScanOutcome, ScanResult, Scanner};
pub use stats::{ScanStats, StatRecorder};
pub use types::{EntryKind, ScanEvent, ScanOptions, ScanTarget, VisitedEntry};
pub use validate::{Validator, ValidatorSet};

#[cfg(test)]
mod tests;
