//! In-memory progress repository for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, StepId, UserId, WizardId};
use crate::domain::progression::UserStepProgress;
use crate::ports::ProgressRepository;

type ProgressKey = (UserId, WizardId, StepId);

/// In-memory implementation of the ProgressRepository port.
///
/// The map insert under a write lock mirrors the database upsert: one
/// atomic replace per (user, wizard, step), last-writer-wins.
pub struct InMemoryProgressRepository {
    rows: RwLock<HashMap<ProgressKey, UserStepProgress>>,
}

impl InMemoryProgressRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProgressRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn upsert(&self, progress: &UserStepProgress) -> Result<UserStepProgress, DomainError> {
        let key = (
            progress.user_id.clone(),
            progress.wizard_id,
            progress.step_id,
        );
        self.rows.write().await.insert(key, progress.clone());
        Ok(progress.clone())
    }

    async fn find(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
        step_id: StepId,
    ) -> Result<Option<UserStepProgress>, DomainError> {
        let key = (user_id.clone(), wizard_id, step_id);
        Ok(self.rows.read().await.get(&key).cloned())
    }

    async fn list_for_wizard(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
    ) -> Result<Vec<UserStepProgress>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|row| &row.user_id == user_id && row.wizard_id == wizard_id)
            .cloned()
            .collect())
    }
}
