//! GetStepStatusHandler - Query handler for per-step pass status.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::{CommunityId, StepId, UserId, WizardId};
use crate::domain::progression::{
    can_proceed, evaluate_completion, CatalogedStep, CompletionOutcome, ProgressionError,
    StepDefinition, StepTypeName,
};
use crate::ports::{ProgressRepository, StepRepository, StepTypeReader, WizardRepository};

/// Query for a user's pass status across a wizard's active steps.
#[derive(Debug, Clone)]
pub struct GetStepStatusQuery {
    pub user_id: UserId,
    /// The caller's community; wizards of other communities grade as absent.
    pub community_id: CommunityId,
    pub wizard_id: WizardId,
}

/// Pass status for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPassStatus {
    pub step_id: StepId,
    pub position: i32,
    pub is_mandatory: bool,
    pub step_type: Option<StepTypeName>,
    /// The user has a progress row with `completed_at` set.
    pub attempted: bool,
    /// `can_proceed` for this step.
    pub passed: bool,
}

/// Result of the status query.
#[derive(Debug, Clone)]
pub struct GetStepStatusResult {
    /// Active steps in position order.
    pub statuses: Vec<StepPassStatus>,
    /// Whether the wizard as a whole is currently completable.
    pub completable: bool,
}

/// Handler feeding the client's progress UI.
pub struct GetStepStatusHandler {
    wizards: Arc<dyn WizardRepository>,
    steps: Arc<dyn StepRepository>,
    step_types: Arc<dyn StepTypeReader>,
    progress: Arc<dyn ProgressRepository>,
}

impl GetStepStatusHandler {
    pub fn new(
        wizards: Arc<dyn WizardRepository>,
        steps: Arc<dyn StepRepository>,
        step_types: Arc<dyn StepTypeReader>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            wizards,
            steps,
            step_types,
            progress,
        }
    }

    pub async fn handle(
        &self,
        query: GetStepStatusQuery,
    ) -> Result<GetStepStatusResult, ProgressionError> {
        self.wizards
            .find(query.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?
            .filter(|w| w.community_id == query.community_id)
            .ok_or(ProgressionError::WizardNotFound(query.wizard_id))?;

        let steps = self
            .steps
            .list_for_wizard(query.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let catalog = self
            .step_types
            .all()
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let kinds: HashMap<_, _> = catalog.iter().map(|e| (e.id, e.kind())).collect();

        let progress_rows = self
            .progress
            .list_for_wizard(&query.user_id, query.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let progress: HashMap<_, _> = progress_rows
            .into_iter()
            .map(|row| (row.step_id, row))
            .collect();

        let cataloged: Vec<CatalogedStep> = steps
            .into_iter()
            .filter(|step| step.is_active)
            .map(|step| {
                let kind = kinds.get(&step.step_type_id).copied().flatten();
                CatalogedStep::new(step, kind)
            })
            .collect();

        let mut statuses: Vec<StepPassStatus> = cataloged
            .iter()
            .map(|c| {
                let record = progress.get(&c.step.id);
                let definition = StepDefinition::new(c.step.is_mandatory, c.step_type);
                StepPassStatus {
                    step_id: c.step.id,
                    position: c.step.position,
                    is_mandatory: c.step.is_mandatory,
                    step_type: c.step_type,
                    attempted: record.is_some_and(|r| r.is_attempted()),
                    passed: can_proceed(record, Some(&definition)),
                }
            })
            .collect();
        statuses.sort_by_key(|s| s.position);

        let completable = matches!(
            evaluate_completion(&cataloged, &progress),
            CompletionOutcome::Completable { .. }
        );

        Ok(GetStepStatusResult {
            statuses,
            completable,
        })
    }
}
