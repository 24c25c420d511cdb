//! Progression-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | WizardNotFound | 404 |
//! | StepNotFound | 404 |
//! | WizardInactive | 404 |
//! | NotCompletable | 409 |
//! | InvalidReorder | 400 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{StepId, WizardId};

/// Progression-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    /// Wizard was not found (or belongs to another community).
    WizardNotFound(WizardId),

    /// Step was not found under the wizard.
    StepNotFound { wizard_id: WizardId, step_id: StepId },

    /// Wizard exists but is not active for end-users.
    WizardInactive(WizardId),

    /// Wizard completion was requested but mandatory steps do not pass.
    /// Carries exactly the failing step ids; no state was changed.
    NotCompletable { failing_step_ids: Vec<StepId> },

    /// A reorder request was internally inconsistent (duplicate positions,
    /// steps from another wizard, or an incomplete assignment).
    InvalidReorder { reason: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl ProgressionError {
    pub fn wizard_not_found(id: WizardId) -> Self {
        ProgressionError::WizardNotFound(id)
    }

    pub fn step_not_found(wizard_id: WizardId, step_id: StepId) -> Self {
        ProgressionError::StepNotFound { wizard_id, step_id }
    }

    pub fn not_completable(failing_step_ids: Vec<StepId>) -> Self {
        ProgressionError::NotCompletable { failing_step_ids }
    }

    pub fn invalid_reorder(reason: impl Into<String>) -> Self {
        ProgressionError::InvalidReorder {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ProgressionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ProgressionError::Infrastructure(message.into())
    }
}

impl std::fmt::Display for ProgressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressionError::WizardNotFound(id) => write!(f, "Wizard {} not found", id),
            ProgressionError::StepNotFound { wizard_id, step_id } => {
                write!(f, "Step {} not found under wizard {}", step_id, wizard_id)
            }
            ProgressionError::WizardInactive(id) => write!(f, "Wizard {} is not active", id),
            ProgressionError::NotCompletable { failing_step_ids } => {
                write!(f, "{} mandatory step(s) not passed", failing_step_ids.len())
            }
            ProgressionError::InvalidReorder { reason } => {
                write!(f, "Invalid reorder request: {}", reason)
            }
            ProgressionError::ValidationFailed { field, message } => {
                write!(f, "Validation failed on '{}': {}", field, message)
            }
            ProgressionError::Infrastructure(message) => {
                write!(f, "Infrastructure error: {}", message)
            }
        }
    }
}

impl std::error::Error for ProgressionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_completable_reports_failing_count() {
        let err = ProgressionError::not_completable(vec![StepId::new(), StepId::new()]);
        assert_eq!(format!("{}", err), "2 mandatory step(s) not passed");
    }
}
