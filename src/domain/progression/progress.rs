//! Per-user step progress records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StepId, Timestamp, UserId, WizardId};

/// One row per (user, wizard, step).
///
/// Created on the first completion attempt and upserted on re-completion;
/// concurrent writers are serialized by the upsert's conflict target, so the
/// final row is last-writer-wins on `completed_at` and `verified_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStepProgress {
    pub user_id: UserId,
    pub wizard_id: WizardId,
    pub step_id: StepId,
    /// Set when the step was attempted. For mandatory quiz steps, attempting
    /// is not passing - see `verified_data`.
    pub completed_at: Option<Timestamp>,
    /// Opaque per-step-type result payload. Quiz variants store
    /// `{answers, total_score, passed}`; other types store whatever the
    /// step's verifier produced. Never trusted without going through
    /// `verified_data::quiz_passed`.
    pub verified_data: Option<serde_json::Value>,
}

impl UserStepProgress {
    /// Creates a progress record marking an attempt at `completed_at = now`.
    pub fn attempted(
        user_id: UserId,
        wizard_id: WizardId,
        step_id: StepId,
        verified_data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            user_id,
            wizard_id,
            step_id,
            completed_at: Some(Timestamp::now()),
            verified_data,
        }
    }

    /// Whether the step was attempted at all.
    pub fn is_attempted(&self) -> bool {
        self.completed_at.is_some()
    }
}
