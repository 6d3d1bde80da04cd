//! Bundled rule validators. The pipeline contract is open; these cover
//! the common release-hygiene checks so the CLI works out of the box.

use std::sync::Arc;

use crate::config::RulesConfig;
use crate::ledger::{Severity, ValidationError};
use crate::types::VisitedEntry;
use crate::validate::{Validator, ValidatorSet};

/// Flags files whose extension is on a deny list.
pub struct ForbiddenExtensions {
    extensions: Vec<String>,
}

impl ForbiddenExtensions {
    pub fn new(extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { extensions: extensions.into_iter().map(|e| e.into().to_ascii_lowercase()).collect() }
    }
}

impl Validator for ForbiddenExtensions {
    fn name(&self) -> &str {
        "forbidden_extensions"
    }

    fn validate(&self, entry: &VisitedEntry) -> Vec<ValidationError> {
        if entry.is_dir() {
            return Vec::new();
        }
        let Some(ext) = entry.extension() else {
            return Vec::new();
        };
        if self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            vec![ValidationError::new(
                "forbidden_extension",
                format!("forbidden file extension .{}", ext.to_ascii_lowercase()),
                Severity::Error,
                &entry.path,
            )]
        } else {
            Vec::new()
        }
    }
}

/// Flags zero-byte files, which usually indicate a truncated transfer.
pub struct EmptyFiles;

impl Validator for EmptyFiles {
    fn name(&self) -> &str {
        "empty_files"
    }

    fn validate(&self, entry: &VisitedEntry) -> Vec<ValidationError> {
        match entry.size {
            Some(0) => vec![ValidationError::new(
                "empty_file",
                "file is empty",
                Severity::Warning,
                &entry.path,
            )],
            _ => Vec::new(),
        }
    }
}

/// Builds the configured pipeline for the CLI.
pub fn from_config(config: &RulesConfig) -> ValidatorSet {
    let mut set = ValidatorSet::default();
    if !config.forbidden_extensions.is_empty() {
        set.push(Arc::new(ForbiddenExtensions::new(config.forbidden_extensions.clone())));
    }
    if config.flag_empty_files {
        set.push(Arc::new(EmptyFiles));
    }
    set
}
