use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tokio::time::timeout;

use crate::error::ScanError;
use crate::types::ScanOptions;

/// Asynchronous predicate deciding whether a path is skipped entirely.
///
/// Implementations may block on remote lookups and may fail; the gate
/// resolves both failure and timeout to "excluded" (fail-closed).
#[async_trait]
pub trait ExclusionPolicy: Send + Sync {
    /// `skip_queue_check` requests the lighter variant used during
    /// time-sensitive bundle ingestion.
    async fn is_excluded(&self, path: &Path, skip_queue_check: bool) -> anyhow::Result<bool>;
}

/// Policy that excludes nothing.
pub struct NoExclusions;

#[async_trait]
impl ExclusionPolicy for NoExclusions {
    async fn is_excluded(&self, _path: &Path, _skip_queue_check: bool) -> anyhow::Result<bool> {
        Ok(false)
    }
}

/// Pattern-based policy matching paths against a compiled glob set.
pub struct GlobExclusionPolicy {
    set: GlobSet,
}

impl GlobExclusionPolicy {
    pub fn new(patterns: &[String]) -> Result<Self, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            if pattern.trim().is_empty() {
                continue;
            }
            // Normalize backslashes so patterns behave the same across
            // platforms.
            let norm = pattern.trim().replace('\\', "/");
            builder.add(Glob::new(&norm)?);
        }
        Ok(Self { set: builder.build()? })
    }
}

#[async_trait]
impl ExclusionPolicy for GlobExclusionPolicy {
    async fn is_excluded(&self, path: &Path, _skip_queue_check: bool) -> anyhow::Result<bool> {
        if self.set.is_empty() {
            return Ok(false);
        }
        let normalized = path.to_string_lossy().replace('\\', "/");
        Ok(self.set.is_match(&normalized))
    }
}

/// Wraps an [`ExclusionPolicy`] with the scan-facing semantics: a
/// disabled gate answers without any policy call, and an enabled gate
/// fails closed on policy error or timeout without ever surfacing a
/// scan violation.
pub struct ExclusionGate {
    policy: Arc<dyn ExclusionPolicy>,
    timeout: Duration,
    enabled: bool,
    skip_queue_check: bool,
}

impl ExclusionGate {
    pub fn new(policy: Arc<dyn ExclusionPolicy>, options: &ScanOptions) -> Self {
        Self {
            policy,
            timeout: Duration::from_millis(options.policy_timeout_ms.max(1)),
            enabled: options.check_excluded,
            skip_queue_check: options.skip_queue_check,
        }
    }

    /// Gate that never performs an external call.
    pub fn disabled() -> Self {
        Self {
            policy: Arc::new(NoExclusions),
            timeout: Duration::from_millis(1),
            enabled: false,
            skip_queue_check: false,
        }
    }

    /// Whether `path` should be skipped. Never fails.
    pub async fn check(&self, path: &Path) -> bool {
        if !self.enabled {
            return false;
        }

        match timeout(self.timeout, self.policy.is_excluded(path, self.skip_queue_check)).await {
            Ok(Ok(excluded)) => excluded,
            Ok(Err(err)) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "exclusion policy failed, treating path as excluded"
                );
                true
            }
            Err(_) => {
                tracing::debug!(
                    path = %path.display(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "exclusion policy timed out, treating path as excluded"
                );
                true
            }
        }
    }
}
