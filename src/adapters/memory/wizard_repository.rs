//! In-memory wizard repository for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp, UserId, WizardId};
use crate::domain::progression::{Wizard, WizardCompletion};
use crate::ports::WizardRepository;

/// In-memory implementation of the WizardRepository port.
pub struct InMemoryWizardRepository {
    wizards: RwLock<HashMap<WizardId, Wizard>>,
    completions: RwLock<HashMap<(UserId, WizardId), WizardCompletion>>,
}

impl InMemoryWizardRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            wizards: RwLock::new(HashMap::new()),
            completions: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a wizard (test seeding).
    pub async fn insert(&self, wizard: Wizard) {
        self.wizards.write().await.insert(wizard.id, wizard);
    }
}

impl Default for InMemoryWizardRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WizardRepository for InMemoryWizardRepository {
    async fn find(&self, wizard_id: WizardId) -> Result<Option<Wizard>, DomainError> {
        Ok(self.wizards.read().await.get(&wizard_id).cloned())
    }

    async fn record_completion(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
        completed_at: Timestamp,
    ) -> Result<WizardCompletion, DomainError> {
        let mut completions = self.completions.write().await;
        let key = (user_id.clone(), wizard_id);
        let completion = match completions.get(&key) {
            Some(existing) => existing.recompleted(completed_at),
            None => WizardCompletion::first(user_id.clone(), wizard_id, completed_at),
        };
        completions.insert(key, completion.clone());
        Ok(completion)
    }

    async fn find_completion(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
    ) -> Result<Option<WizardCompletion>, DomainError> {
        let key = (user_id.clone(), wizard_id);
        Ok(self.completions.read().await.get(&key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completion_upsert_bumps_version() {
        let repo = InMemoryWizardRepository::new();
        let user_id = UserId::new("user-1").unwrap();
        let wizard_id = WizardId::new();

        let first = repo
            .record_completion(&user_id, wizard_id, Timestamp::now())
            .await
            .unwrap();
        let second = repo
            .record_completion(&user_id, wizard_id, Timestamp::now())
            .await
            .unwrap();

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(
            repo.find_completion(&user_id, wizard_id)
                .await
                .unwrap()
                .unwrap()
                .version,
            2
        );
    }
}
