//! ProgressRepository port - per-user step progress access.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StepId, UserId, WizardId};
use crate::domain::progression::UserStepProgress;

/// Port for reading and upserting user step progress.
///
/// The write path is a single atomic upsert keyed on
/// `(user_id, wizard_id, step_id)` - never a read-then-write pair.
/// Concurrent completions of the same step by the same user serialize on
/// the conflict target; the final row is last-writer-wins.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Inserts or overwrites the progress row for (user, wizard, step).
    async fn upsert(&self, progress: &UserStepProgress) -> Result<UserStepProgress, DomainError>;

    /// Finds one progress row, if the user ever attempted the step.
    async fn find(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
        step_id: StepId,
    ) -> Result<Option<UserStepProgress>, DomainError>;

    /// Lists the user's progress rows across a wizard.
    async fn list_for_wizard(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
    ) -> Result<Vec<UserStepProgress>, DomainError>;
}
