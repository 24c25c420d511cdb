//! WizardRepository port - wizard configuration and completion records.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId, WizardId};
use crate::domain::progression::{Wizard, WizardCompletion};

/// Port for wizard rows and completion records.
#[async_trait]
pub trait WizardRepository: Send + Sync {
    /// Finds a wizard by id.
    async fn find(&self, wizard_id: WizardId) -> Result<Option<Wizard>, DomainError>;

    /// Upserts the completion record for (user, wizard).
    ///
    /// First completion writes `version = 1`; re-completion bumps the
    /// version and refreshes `completed_at`, in one atomic upsert.
    async fn record_completion(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
        completed_at: Timestamp,
    ) -> Result<WizardCompletion, DomainError>;

    /// Finds the completion record for (user, wizard), if any.
    async fn find_completion(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
    ) -> Result<Option<WizardCompletion>, DomainError>;
}
