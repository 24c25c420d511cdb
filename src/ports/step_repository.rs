//! StepRepository port - step configuration access.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StepId, WizardId};
use crate::domain::progression::Step;

/// Port for reading and reordering step configuration.
///
/// Step rows are admin-owned; this service reads them to grade progress and
/// rewrites only their ordering.
#[async_trait]
pub trait StepRepository: Send + Sync {
    /// Finds a step under a wizard. Returns `None` if the step does not
    /// exist or belongs to a different wizard.
    async fn find(
        &self,
        wizard_id: WizardId,
        step_id: StepId,
    ) -> Result<Option<Step>, DomainError>;

    /// Lists every step configured under a wizard, ordered by position.
    async fn list_for_wizard(&self, wizard_id: WizardId) -> Result<Vec<Step>, DomainError>;

    /// Applies a full position assignment for a wizard's steps ATOMICALLY.
    ///
    /// `ordering` maps every step of the wizard to its new position. The
    /// uniqueness constraint on `(wizard_id, position)` must never reject an
    /// intermediate state: implementations commit the whole assignment in
    /// one transaction (deferred constraint, or a two-phase offset pass) or
    /// not at all.
    async fn reorder(
        &self,
        wizard_id: WizardId,
        ordering: &[(StepId, i32)],
    ) -> Result<(), DomainError>;
}
