//! CompleteStepHandler - Command handler for recording a step completion attempt.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{CommunityId, StepId, UserId, WizardId};
use crate::domain::progression::{
    can_proceed, ProgressionError, StepDefinition, UserStepProgress, VerifiedData,
};
use crate::ports::{ProgressRepository, StepRepository, StepTypeReader, WizardRepository};

/// Command to record a completion attempt for one step.
#[derive(Debug, Clone)]
pub struct CompleteStepCommand {
    pub user_id: UserId,
    /// The caller's community; wizards of other communities grade as absent.
    pub community_id: CommunityId,
    pub wizard_id: WizardId,
    pub step_id: StepId,
    /// Raw verifier payload; validated fail-closed before grading.
    pub verified_data: Option<Value>,
}

/// Result of a completion attempt.
///
/// The attempt is always recorded (upsert); `passed` reports whether the
/// step now grades as passed. A failed quiz attempt is a successful
/// command with `passed = false`.
#[derive(Debug, Clone)]
pub struct CompleteStepResult {
    pub progress: UserStepProgress,
    pub passed: bool,
}

/// Handler for step completion attempts.
pub struct CompleteStepHandler {
    wizards: Arc<dyn WizardRepository>,
    steps: Arc<dyn StepRepository>,
    step_types: Arc<dyn StepTypeReader>,
    progress: Arc<dyn ProgressRepository>,
}

impl CompleteStepHandler {
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
        cmd: CompleteStepCommand,
    ) -> Result<CompleteStepResult, ProgressionError> {
        // 1. Resolve the wizard; completion attempts require an active one
        //    owned by the caller's community (no cross-community reads)
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

        // 2. Resolve the step under this wizard; inactive steps grade as absent
        let step = self
            .steps
            .find(cmd.wizard_id, cmd.step_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?
            .filter(|s| s.is_active)
            .ok_or(ProgressionError::StepNotFound {
                wizard_id: cmd.wizard_id,
                step_id: cmd.step_id,
            })?;

        // 3. Resolve the catalog type for grading
        let catalog_entry = self
            .step_types
            .find(step.step_type_id)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;
        let definition =
            StepDefinition::resolve(&step, catalog_entry.as_ref().map(|e| e.name.as_str()));

        // 4. Boundary validation: quiz payloads parse fail-closed into
        //    their typed shape, so malformed input grades as a failed
        //    attempt rather than an error
        if let (Some(step_type), Some(value)) = (definition.step_type, &cmd.verified_data) {
            if let VerifiedData::Quiz(result) = VerifiedData::parse(step_type, value) {
                tracing::debug!(
                    step_id = %cmd.step_id,
                    passed = result.passed,
                    "quiz payload graded at boundary"
                );
            }
        }

        // 5. Upsert the attempt; concurrent attempts serialize on the
        //    (user, wizard, step) conflict target
        let attempt = UserStepProgress::attempted(
            cmd.user_id.clone(),
            cmd.wizard_id,
            cmd.step_id,
            cmd.verified_data.clone(),
        );
        let stored = self
            .progress
            .upsert(&attempt)
            .await
            .map_err(|e| ProgressionError::infrastructure(e.to_string()))?;

        // 6. Grade the stored row
        let passed = can_proceed(Some(&stored), Some(&definition));

        tracing::debug!(
            user_id = %cmd.user_id,
            wizard_id = %cmd.wizard_id,
            step_id = %cmd.step_id,
            passed,
            "step completion attempt recorded"
        );

        Ok(CompleteStepResult {
            progress: stored,
            passed,
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
    use crate::domain::foundation::{CommunityId, StepTypeId};
    use crate::domain::progression::{Step, StepTypeEntry, Wizard};
    use serde_json::json;

    struct Fixture {
        community_id: CommunityId,
        wizard_id: WizardId,
        step_id: StepId,
        handler: CompleteStepHandler,
    }

    async fn fixture(step_type_name: &str, is_mandatory: bool) -> Fixture {
        let community_id = CommunityId::new();
        let wizard_id = WizardId::new();
        let step_id = StepId::new();
        let step_type_id = StepTypeId::new();

        let wizards = Arc::new(InMemoryWizardRepository::new());
        wizards
            .insert(Wizard {
                id: wizard_id,
                community_id,
                name: "New member onboarding".to_string(),
                is_active: true,
            })
            .await;

        let step_types = Arc::new(InMemoryStepTypeReader::new());
        step_types
            .insert(StepTypeEntry {
                id: step_type_id,
                name: step_type_name.to_string(),
                requires_credentials: false,
            })
            .await;

        let steps = Arc::new(InMemoryStepRepository::new());
        steps
            .insert(Step {
                id: step_id,
                wizard_id,
                step_type_id,
                position: 1,
                is_mandatory,
                target_role_id: None,
                is_active: true,
            })
            .await;

        let progress = Arc::new(InMemoryProgressRepository::new());
        let handler = CompleteStepHandler::new(wizards, steps, step_types, progress);

        Fixture {
            community_id,
            wizard_id,
            step_id,
            handler,
        }
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn passing_quiz_attempt_grades_as_passed() {
        let f = fixture("quizmaster_basic", true).await;
        let result = f
            .handler
            .handle(CompleteStepCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: f.wizard_id,
                step_id: f.step_id,
                verified_data: Some(json!({"passed": true, "answers": [0, 2]})),
            })
            .await
            .unwrap();

        assert!(result.passed);
        assert!(result.progress.is_attempted());
    }

    #[tokio::test]
    async fn failed_quiz_attempt_is_recorded_but_not_passed() {
        let f = fixture("quizmaster_basic", true).await;
        let result = f
            .handler
            .handle(CompleteStepCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: f.wizard_id,
                step_id: f.step_id,
                verified_data: Some(json!({"passed": false})),
            })
            .await
            .unwrap();

        assert!(!result.passed);
        assert!(result.progress.is_attempted());
    }

    #[tokio::test]
    async fn reattempt_overwrites_previous_payload() {
        let f = fixture("quizmaster_basic", true).await;
        let cmd = |data| CompleteStepCommand {
            user_id: user(),
            community_id: f.community_id,
            wizard_id: f.wizard_id,
            step_id: f.step_id,
            verified_data: Some(data),
        };

        let first = f.handler.handle(cmd(json!({"passed": false}))).await.unwrap();
        assert!(!first.passed);

        let second = f.handler.handle(cmd(json!({"passed": true}))).await.unwrap();
        assert!(second.passed);
    }

    #[tokio::test]
    async fn content_step_passes_on_attempt_without_payload() {
        let f = fixture("content", true).await;
        let result = f
            .handler
            .handle(CompleteStepCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: f.wizard_id,
                step_id: f.step_id,
                verified_data: None,
            })
            .await
            .unwrap();

        assert!(result.passed);
    }

    #[tokio::test]
    async fn unknown_step_type_records_attempt_but_blocks_mandatory_pass() {
        let f = fixture("quizmaster_deluxe", true).await;
        let result = f
            .handler
            .handle(CompleteStepCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: f.wizard_id,
                step_id: f.step_id,
                verified_data: Some(json!({"passed": true})),
            })
            .await
            .unwrap();

        assert!(!result.passed);
        assert!(result.progress.is_attempted());
    }

    #[tokio::test]
    async fn missing_step_is_not_found() {
        let f = fixture("content", false).await;
        let err = f
            .handler
            .handle(CompleteStepCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: f.wizard_id,
                step_id: StepId::new(),
                verified_data: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressionError::StepNotFound { .. }));
    }

    #[tokio::test]
    async fn missing_wizard_is_not_found() {
        let f = fixture("content", false).await;
        let err = f
            .handler
            .handle(CompleteStepCommand {
                user_id: user(),
                community_id: f.community_id,
                wizard_id: WizardId::new(),
                step_id: f.step_id,
                verified_data: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressionError::WizardNotFound(_)));
    }
}
