//! HTTP DTOs (Data Transfer Objects) for wizard progression endpoints.
//!
//! These types define the JSON request/response structure for the wizard
//! API. They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::progression::{
    CompleteStepResult, CompleteWizardResult, GetStepStatusResult, ReorderStepsResult,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to record a step completion attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteStepRequest {
    /// Verifier payload for the step (quiz result, credential proof, ...).
    #[serde(default)]
    pub verified_data: Option<Value>,
}

/// One entry of a reorder assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct StepOrderEntry {
    pub step_id: String,
    pub position: i32,
}

/// Request to reorder a wizard's steps.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderStepsRequest {
    /// Full position assignment covering every step of the wizard.
    pub ordering: Vec<StepOrderEntry>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a step completion attempt.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteStepResponse {
    pub step_id: String,
    /// When the attempt was recorded (ISO 8601).
    pub completed_at: Option<String>,
    /// Whether the step now grades as passed.
    pub passed: bool,
}

impl From<CompleteStepResult> for CompleteStepResponse {
    fn from(result: CompleteStepResult) -> Self {
        Self {
            step_id: result.progress.step_id.to_string(),
            completed_at: result
                .progress
                .completed_at
                .map(|t| t.as_datetime().to_rfc3339()),
            passed: result.passed,
        }
    }
}

/// Response for a successful wizard completion.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteWizardResponse {
    pub wizard_id: String,
    /// When the completion was recorded (ISO 8601).
    pub completed_at: String,
    /// Completion version; increments on re-completion.
    pub version: i32,
    /// Roles granted by this completion (deduplicated).
    pub granted_roles: Vec<String>,
}

impl From<CompleteWizardResult> for CompleteWizardResponse {
    fn from(result: CompleteWizardResult) -> Self {
        Self {
            wizard_id: result.completion.wizard_id.to_string(),
            completed_at: result.completion.completed_at.as_datetime().to_rfc3339(),
            version: result.completion.version,
            granted_roles: result
                .granted_roles
                .iter()
                .map(|role| role.to_string())
                .collect(),
        }
    }
}

/// Pass status for one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepStatusEntry {
    pub step_id: String,
    pub position: i32,
    pub is_mandatory: bool,
    /// Resolved step-type name; null for unknown catalog entries.
    pub step_type: Option<String>,
    pub attempted: bool,
    pub passed: bool,
}

/// Response for the per-step status query.
#[derive(Debug, Clone, Serialize)]
pub struct StepStatusResponse {
    pub steps: Vec<StepStatusEntry>,
    /// Whether the wizard is currently completable.
    pub completable: bool,
}

impl From<GetStepStatusResult> for StepStatusResponse {
    fn from(result: GetStepStatusResult) -> Self {
        Self {
            steps: result
                .statuses
                .into_iter()
                .map(|status| StepStatusEntry {
                    step_id: status.step_id.to_string(),
                    position: status.position,
                    is_mandatory: status.is_mandatory,
                    step_type: status.step_type.map(|t| t.as_str().to_string()),
                    attempted: status.attempted,
                    passed: status.passed,
                })
                .collect(),
            completable: result.completable,
        }
    }
}

/// Response for a successful reorder: steps in their new order.
#[derive(Debug, Clone, Serialize)]
pub struct ReorderStepsResponse {
    pub steps: Vec<StepPositionEntry>,
}

/// One step's position after a reorder.
#[derive(Debug, Clone, Serialize)]
pub struct StepPositionEntry {
    pub step_id: String,
    pub position: i32,
}

impl From<ReorderStepsResult> for ReorderStepsResponse {
    fn from(result: ReorderStepsResult) -> Self {
        Self {
            steps: result
                .steps
                .into_iter()
                .map(|step| StepPositionEntry {
                    step_id: step.id.to_string(),
                    position: step.position,
                })
                .collect(),
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
    /// Step ids blocking a wizard completion, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_step_ids: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Creates an error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
            failing_step_ids: None,
        }
    }

    /// Attaches the blocking step ids.
    pub fn with_failing_steps(mut self, step_ids: Vec<String>) -> Self {
        self.failing_step_ids = Some(step_ids);
        self
    }
}
