use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::ledger::{Severity, ValidationError};
use crate::types::VisitedEntry;

/// A pluggable content check run against every non-excluded entry.
///
/// Validators are stateless with respect to shared data: they read
/// entry metadata and return violations without mutating anything
/// outside their own return value, so one instance is safely shared
/// across concurrent walker workers.
pub trait Validator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn validate(&self, entry: &VisitedEntry) -> Vec<ValidationError>;
}

/// The ordered validator pipeline. Every configured validator runs
/// against every entry; all violations are collected with no
/// short-circuiting on the first hit.
#[derive(Clone, Default)]
pub struct ValidatorSet {
    validators: Vec<Arc<dyn Validator>>,
}

impl ValidatorSet {
    pub fn new(validators: Vec<Arc<dyn Validator>>) -> Self {
        Self { validators }
    }

    pub fn push(&mut self, validator: Arc<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn run(&self, entry: &VisitedEntry) -> Vec<ValidationError> {
        let mut violations = Vec::new();
        for validator in &self.validators {
            // A panicking validator must not unwind the walker task it
            // runs on; the failure is recorded against the entry and
            // the remaining validators still run.
            let found = match catch_unwind(AssertUnwindSafe(|| validator.validate(entry))) {
                Ok(found) => found,
                Err(_) => {
                    tracing::error!(
                        validator = validator.name(),
                        path = %entry.path.display(),
                        "validator panicked"
                    );
                    vec![ValidationError::new(
                        "validator_panic",
                        format!("validator '{}' panicked", validator.name()),
                        Severity::Error,
                        &entry.path,
                    )]
                }
            };
            if !found.is_empty() {
                tracing::trace!(
                    validator = validator.name(),
                    path = %entry.path.display(),
                    count = found.len(),
                    "validator reported violations"
                );
            }
            violations.extend(found);
        }
        violations
    }
}

impl std::fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.validators.iter().map(|v| v.name())).finish()
    }
}
