//! CompleteWizardHandler - Command handler for wizard-level completion.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::{CommunityId, RoleId, Timestamp, UserId, WizardId};
use crate::domain::progression::{
    evaluate_completion, CatalogedStep, CompletionOutcome, ProgressionError, WizardCompletion,
};
use crate::ports::{ProgressRepository, StepRepository, StepTypeReader, WizardRepository};

/// Command to complete a wizard.
#[derive(Debug, Clone)]
pub struct CompleteWizardCommand {
    pub user_id: UserId,
    /// The caller's community; wizards of other communities grade as absent.
    pub community_id: CommunityId,
    pub wizard_id: WizardId,
}

/// Result of a successful wizard completion.
#[derive(Debug, Clone)]
pub struct CompleteWizardResult {
    pub completion: WizardCompletion,
    /// Deduplicated union of roles granted by the user's passed steps.
    pub granted_roles: Vec<RoleId>,
}

/// Handler for wizard completion.
///
/// Rejects with `NotCompletable` (and performs NO state change) unless
/// every active mandatory step passes; on success upserts the completion
/// record, bumping its version on re-completion.
pub struct CompleteWizardHandler {
    wizards: Arc<dyn WizardRepository>,
    steps: Arc<dyn StepRepository>,
    step_types: Arc<dyn StepTypeReader>,
    progress: Arc<dyn ProgressRepository>,
}

impl CompleteWizardHandler {
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
        cmd: CompleteWizardCommand,
    ) -> Result<CompleteWizardResult, ProgressionError> {
        // 1. Resolve the wizard within the caller's community
        let wizard = self
            .wizards
            .find(cmd.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?
            .filter(|w| w.community_id == cmd.community_id)
            .ok_or(ProgressionError::WizardNotFound(cmd.wizard_id))?;
        if !wizard.is_active {
            return Err(ProgressionError::WizardInactive(cmd.wizard_id));
        }

        // 2. Load steps joined with their catalog types
        let steps = self
            .steps
            .list_for_wizard(cmd.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let catalog = self
            .step_types
            .all()
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let kinds: HashMap<_, _> = catalog.iter().map(|e| (e.id, e.kind())).collect();

        let cataloged: Vec<CatalogedStep> = steps
            .into_iter()
            .map(|step| {
                let kind = kinds.get(&step.step_type_id).copied().flatten();
                CatalogedStep::new(step, kind)
            })
            .collect();

        // 3. Load the user's progress across the wizard
        let progress_rows = self
            .progress
            .list_for_wizard(&cmd.user_id, cmd.wizard_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let progress: HashMap<_, _> = progress_rows
            .into_iter()
            .map(|row| (row.step_id, row))
            .collect();

        // 4. Evaluate; a blocked outcome writes nothing
        let granted_roles = match evaluate_completion(&cataloged, &progress) {
            CompletionOutcome::Blocked { failing_step_ids } => {
                tracing::info!(
                    user_id = %cmd.user_id,
                    wizard_id = %cmd.wizard_id,
                    failing = failing_step_ids.len(),
                    "wizard completion blocked"
                );
                return Err(ProgressionError::not_completable(failing_step_ids));
            }
            CompletionOutcome::Completable { granted_roles } => granted_roles,
        };

        // 5. Upsert the completion record (version bump on re-completion)
        let completion = self
            .wizards
            .record_completion(&cmd.user_id, cmd.wizard_id, Timestamp::now())
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;

        tracing::debug!(
            user_id = %cmd.user_id,
            wizard_id = %cmd.wizard_id,
            version = completion.version,
            roles = granted_roles.len(),
            "wizard completed"
        );

        Ok(CompleteWizardResult {
            completion,
            granted_roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryProgressRepository, InMemoryStepRepository, InMemoryStepTypeReader,
        InMemoryWizardRepository,
    };
    use crate::domain::foundation::{CommunityId, StepId, StepTypeId};
    use crate::domain::progression::{Step, StepTypeEntry, UserStepProgress, Wizard};
    use serde_json::json;

    struct Fixture {
        community_id: CommunityId,
        wizard_id: WizardId,
        steps: Arc<InMemoryStepRepository>,
        step_types: Arc<InMemoryStepTypeReader>,
        progress: Arc<InMemoryProgressRepository>,
        wizards: Arc<InMemoryWizardRepository>,
    }

    impl Fixture {
        async fn new() -> Self {
            let community_id = CommunityId::new();
            let wizard_id = WizardId::new();
            let wizards = Arc::new(InMemoryWizardRepository::new());
            wizards
                .insert(Wizard {
                    id: wizard_id,
                    community_id,
                    name: "New member onboarding".to_string(),
                    is_active: true,
                })
                .await;

            Self {
                community_id,
                wizard_id,
                steps: Arc::new(InMemoryStepRepository::new()),
                step_types: Arc::new(InMemoryStepTypeReader::new()),
                progress: Arc::new(InMemoryProgressRepository::new()),
                wizards,
            }
        }

        async fn add_step(
            &self,
            type_name: &str,
            is_mandatory: bool,
            target_role_id: Option<RoleId>,
        ) -> StepId {
            let step_id = StepId::new();
            let step_type_id = StepTypeId::new();
            self.step_types
                .insert(StepTypeEntry {
                    id: step_type_id,
                    name: type_name.to_string(),
                    requires_credentials: false,
                })
                .await;
            self.steps
                .insert(Step {
                    id: step_id,
                    wizard_id: self.wizard_id,
                    step_type_id,
                    position: 0,
                    is_mandatory,
                    target_role_id,
                    is_active: true,
                })
                .await;
            step_id
        }

        async fn attempt(&self, step_id: StepId, verified_data: Option<serde_json::Value>) {
            self.progress
                .upsert(&UserStepProgress::attempted(
                    user(),
                    self.wizard_id,
                    step_id,
                    verified_data,
                ))
                .await
                .unwrap();
        }

        fn handler(&self) -> CompleteWizardHandler {
            CompleteWizardHandler::new(
                self.wizards.clone(),
                self.steps.clone(),
                self.step_types.clone(),
                self.progress.clone(),
            )
        }
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn completion_succeeds_when_all_mandatory_steps_pass() {
        let f = Fixture::new().await;
        let role = RoleId::new();
        let content = f.add_step("content", true, Some(role)).await;
        let quiz = f.add_step("quizmaster_basic", true, None).await;

        f.attempt(content, None).await;
        f.attempt(quiz, Some(json!({"passed": true}))).await;

        let result = f
            .handler()
            .handle(CompleteWizardCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: f.wizard_id,
            })
            .await
            .unwrap();

        assert_eq!(result.completion.version, 1);
        assert_eq!(result.granted_roles, vec![role]);
    }

    #[tokio::test]
    async fn blocked_completion_reports_failing_steps_and_writes_nothing() {
        let f = Fixture::new().await;
        let passing = f.add_step("content", true, None).await;
        let failing = f.add_step("quizmaster_ai", true, None).await;

        f.attempt(passing, None).await;
        f.attempt(failing, Some(json!({"passed": false}))).await;

        let err = f
            .handler()
            .handle(CompleteWizardCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: f.wizard_id,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProgressionError::NotCompletable {
                failing_step_ids: vec![failing]
            }
        );
        assert!(f
            .wizards
            .find_completion(&user(), f.wizard_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn recompletion_bumps_version() {
        let f = Fixture::new().await;
        let content = f.add_step("content", true, None).await;
        f.attempt(content, None).await;

        let handler = f.handler();
        let cmd = CompleteWizardCommand {
            user_id: user(),
            community_id: f.community_id,
            wizard_id: f.wizard_id,
        };
        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(first.completion.version, 1);
        assert_eq!(second.completion.version, 2);
    }

    #[tokio::test]
    async fn missing_wizard_is_not_found() {
        let f = Fixture::new().await;
        let err = f
            .handler()
            .handle(CompleteWizardCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: WizardId::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressionError::WizardNotFound(_)));
    }
}
