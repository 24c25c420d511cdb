//! In-memory step repository for testing and local development.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, StepId, WizardId};
use crate::domain::progression::Step;
use crate::ports::StepRepository;

/// In-memory implementation of the StepRepository port.
///
/// Reorder is all-or-nothing: the new assignment is validated against the
/// uniqueness rule before any position changes, mirroring the deferred
/// constraint the PostgreSQL adapter relies on.
pub struct InMemoryStepRepository {
    steps: RwLock<Vec<Step>>,
}

impl InMemoryStepRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            steps: RwLock::new(Vec::new()),
        }
    }

    /// Inserts a step (test seeding).
    pub async fn insert(&self, step: Step) {
        self.steps.write().await.push(step);
    }
}

impl Default for InMemoryStepRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepRepository for InMemoryStepRepository {
    async fn find(
        &self,
        wizard_id: WizardId,
        step_id: StepId,
    ) -> Result<Option<Step>, DomainError> {
        Ok(self
            .steps
            .read()
            .await
            .iter()
            .find(|s| s.wizard_id == wizard_id && s.id == step_id)
            .cloned())
    }

    async fn list_for_wizard(&self, wizard_id: WizardId) -> Result<Vec<Step>, DomainError> {
        let mut steps: Vec<Step> = self
            .steps
            .read()
            .await
            .iter()
            .filter(|s| s.wizard_id == wizard_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.position);
        Ok(steps)
    }

    async fn reorder(
        &self,
        wizard_id: WizardId,
        ordering: &[(StepId, i32)],
    ) -> Result<(), DomainError> {
        let mut steps = self.steps.write().await;

        // Validate the full assignment before touching anything.
        let positions: HashSet<i32> = ordering.iter().map(|(_, pos)| *pos).collect();
        if positions.len() != ordering.len() {
            return Err(DomainError::new(
                ErrorCode::DuplicateStepPosition,
                "Duplicate position in reorder assignment",
            ));
        }
        for (step_id, _) in ordering {
            if !steps
                .iter()
                .any(|s| s.wizard_id == wizard_id && s.id == *step_id)
            {
                return Err(DomainError::new(
                    ErrorCode::StepNotFound,
                    format!("Step {} not found under wizard {}", step_id, wizard_id),
                ));
            }
        }

        for (step_id, position) in ordering {
            if let Some(step) = steps
                .iter_mut()
                .find(|s| s.wizard_id == wizard_id && s.id == *step_id)
            {
                step.position = *position;
            }
        }
        Ok(())
    }
}
