use thiserror::Error;

/// The primary error type for the crate.
///
/// Only malformed top-level input fails a scan synchronously; failures
/// encountered during traversal are contained and recorded in the
/// ledger instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Invalid caller input, rejected before any traversal begins.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An exclusion pattern could not be compiled.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),
    /// Internal scanner failure.
    #[error("scanner error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Helpers for validating caller-supplied input before a scan starts.
pub mod validation {
    use std::path::Path;

    use super::ScanError;
    use crate::types::ScanTarget;

    /// Checks a raw path for emptiness and embedded NUL characters.
    pub fn validate_path(path: &Path) -> Result<(), ScanError> {
        if path.as_os_str().is_empty() {
            return Err(ScanError::InvalidInput("path cannot be empty".to_string()));
        }

        if path.to_string_lossy().contains('\0') {
            return Err(ScanError::InvalidInput("path contains null characters".to_string()));
        }

        Ok(())
    }

    /// Validates every submitted root target.
    pub fn validate_targets(targets: &[ScanTarget]) -> Result<(), ScanError> {
        for target in targets {
            validate_path(&target.path)?;
        }
        Ok(())
    }
}
