//! Test modules for the releasewarden crate.
//!
//! - **scanner_tests**: traversal, counting, failure isolation and
//!   outcome behavior of the tree walker and facade
//! - **exclude_tests**: exclusion gate semantics (fail-closed, timeout,
//!   disabled fast path) and the bundled glob policy
//! - **ledger_tests**: deterministic ledger ordering and pick-one
//! - **stats_tests**: counter snapshots and summary rendering
//! - **error_tests**: synchronous input validation
//! - **config_tests**: configuration loading and validation

pub mod error_tests;
pub mod exclude_tests;
pub mod stats_tests;
