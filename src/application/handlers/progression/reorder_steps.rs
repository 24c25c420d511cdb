//! ReorderStepsHandler - Command handler for atomic step reordering.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::foundation::{CommunityId, StepId, WizardId};
use crate::domain::progression::{ProgressionError, Step};
use crate::ports::{StepRepository, WizardRepository};

/// Command to apply a full position assignment to a wizard's steps.
#[derive(Debug, Clone)]
pub struct ReorderStepsCommand {
    /// The admin's community; wizards of other communities grade as absent.
    pub community_id: CommunityId,
    pub wizard_id: WizardId,
    /// New position per step. Must cover exactly the wizard's steps with
    /// distinct positions.
    pub ordering: Vec<(StepId, i32)>,
}

/// Result of a successful reorder: the steps in their new order.
#[derive(Debug, Clone)]
pub struct ReorderStepsResult {
    pub steps: Vec<Step>,
}

/// Handler for the admin reorder operation.
///
/// The assignment is validated here and applied by the repository in ONE
/// transaction; the uniqueness constraint on `(wizard_id, position)` never
/// rejects an intermediate state.
pub struct ReorderStepsHandler {
    wizards: Arc<dyn WizardRepository>,
    steps: Arc<dyn StepRepository>,
}

impl ReorderStepsHandler {
    pub fn new(wizards: Arc<dyn WizardRepository>, steps: Arc<dyn StepRepository>) -> Self {
        Self { wizards, steps }
    }

    pub async fn handle(
        &self,
        cmd: ReorderStepsCommand,
    ) -> Result<ReorderStepsResult, ProgressionError> {
        // 1. Resolve the wizard within the admin's community
        self.wizards
            .find(cmd.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?
            .filter(|w| w.community_id == cmd.community_id)
            .ok_or(ProgressionError::WizardNotFound(cmd.wizard_id))?;

        // 2. The assignment must cover exactly the wizard's steps
        let existing = self
            .steps
            .list_for_wizard(cmd.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let existing_ids: HashSet<StepId> = existing.iter().map(|s| s.id).collect();
        let assigned_ids: HashSet<StepId> = cmd.ordering.iter().map(|(id, _)| *id).collect();

        if assigned_ids.len() != cmd.ordering.len() {
            return Err(ProgressionError::invalid_reorder("duplicate step id"));
        }
        if assigned_ids != existing_ids {
            return Err(ProgressionError::invalid_reorder(
                "assignment must cover exactly the wizard's steps",
            ));
        }

        // 3. Positions must be distinct
        let positions: HashSet<i32> = cmd.ordering.iter().map(|(_, pos)| *pos).collect();
        if positions.len() != cmd.ordering.len() {
            return Err(ProgressionError::invalid_reorder("duplicate position"));
        }

        // 4. Apply atomically
        self.steps
            .reorder(cmd.wizard_id, &cmd.ordering)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;

        let steps = self
            .steps
            .list_for_wizard(cmd.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;

        tracing::debug!(
            wizard_id = %cmd.wizard_id,
            steps = steps.len(),
            "steps reordered"
        );

        Ok(ReorderStepsResult { steps })
    }
}
