//! HTTP handlers for wizard progression endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers. The caller's `(user_id, community_id)` comes from the auth
//! extractors and is passed into the application layer as explicit
//! arguments.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::progression::{
    CompleteStepCommand, CompleteStepHandler, CompleteWizardCommand, CompleteWizardHandler,
    GetStepStatusHandler, GetStepStatusQuery, ReorderStepsCommand, ReorderStepsHandler,
};
use crate::domain::foundation::{StepId, WizardId};
use crate::domain::progression::ProgressionError;
use crate::ports::{ProgressRepository, StepRepository, StepTypeReader, WizardRepository};

use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};

use super::dto::{
    CompleteStepRequest, CompleteStepResponse, CompleteWizardResponse, ErrorResponse,
    ReorderStepsRequest, ReorderStepsResponse, StepStatusResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing the wizard module's dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped
/// dependencies for efficient sharing across handlers.
#[derive(Clone)]
pub struct WizardAppState {
    pub wizard_repository: Arc<dyn WizardRepository>,
    pub step_repository: Arc<dyn StepRepository>,
    pub step_type_reader: Arc<dyn StepTypeReader>,
    pub progress_repository: Arc<dyn ProgressRepository>,
}

impl WizardAppState {
    /// Create handlers on demand from the shared state.
    pub fn complete_step_handler(&self) -> CompleteStepHandler {
        CompleteStepHandler::new(
            self.wizard_repository.clone(),
            self.step_repository.clone(),
            self.step_type_reader.clone(),
            self.progress_repository.clone(),
        )
    }

    pub fn complete_wizard_handler(&self) -> CompleteWizardHandler {
        CompleteWizardHandler::new(
            self.wizard_repository.clone(),
            self.step_repository.clone(),
            self.step_type_reader.clone(),
            self.progress_repository.clone(),
        )
    }

    pub fn step_status_handler(&self) -> GetStepStatusHandler {
        GetStepStatusHandler::new(
            self.wizard_repository.clone(),
            self.step_repository.clone(),
            self.step_type_reader.clone(),
            self.progress_repository.clone(),
        )
    }

    pub fn reorder_steps_handler(&self) -> ReorderStepsHandler {
        ReorderStepsHandler::new(self.wizard_repository.clone(), self.step_repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

fn error_response(err: ProgressionError) -> Response {
    match err {
        ProgressionError::WizardNotFound(_) | ProgressionError::WizardInactive(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("WIZARD_NOT_FOUND", err.to_string())),
        )
            .into_response(),
        ProgressionError::StepNotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("STEP_NOT_FOUND", err.to_string())),
        )
            .into_response(),
        ProgressionError::NotCompletable { failing_step_ids } => {
            // Surfaced as "steps not complete", not a generic error; the
            // client highlights exactly these steps.
            let ids = failing_step_ids.iter().map(|id| id.to_string()).collect();
            (
                StatusCode::CONFLICT,
                Json(
                    ErrorResponse::new(
                        "WIZARD_NOT_COMPLETABLE",
                        "One or more mandatory steps are not complete",
                    )
                    .with_failing_steps(ids),
                ),
            )
                .into_response()
        }
        ProgressionError::InvalidReorder { .. } | ProgressionError::ValidationFailed { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("VALIDATION_FAILED", err.to_string())),
        )
            .into_response(),
        ProgressionError::Infrastructure(message) => {
            tracing::error!("wizard endpoint infrastructure error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("INTERNAL_ERROR", "Internal server error")),
            )
                .into_response()
        }
    }
}

fn bad_path(field: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "VALIDATION_FAILED",
            format!("Invalid {} in path", field),
        )),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /wizards/{wizard_id}/steps/status`
pub async fn get_step_status(
    RequireAuth(user): RequireAuth,
    State(state): State<WizardAppState>,
    Path(wizard_id): Path<String>,
) -> Response {
    let Ok(wizard_id) = wizard_id.parse::<WizardId>() else {
        return bad_path("wizard id");
    };

    match state
        .step_status_handler()
        .handle(GetStepStatusQuery {
            user_id: user.user_id,
            community_id: user.community_id,
            wizard_id,
        })
        .await
    {
        Ok(result) => (StatusCode::OK, Json(StepStatusResponse::from(result))).into_response(),
        Err(err) => error_response(err),
    }
}

/// `POST /wizards/{wizard_id}/steps/{step_id}/complete`
pub async fn complete_step(
    RequireAuth(user): RequireAuth,
    State(state): State<WizardAppState>,
    Path((wizard_id, step_id)): Path<(String, String)>,
    Json(body): Json<CompleteStepRequest>,
) -> Response {
    let Ok(wizard_id) = wizard_id.parse::<WizardId>() else {
        return bad_path("wizard id");
    };
    let Ok(step_id) = step_id.parse::<StepId>() else {
        return bad_path("step id");
    };

    match state
        .complete_step_handler()
        .handle(CompleteStepCommand {
            user_id: user.user_id,
            community_id: user.community_id,
            wizard_id,
            step_id,
            verified_data: body.verified_data,
        })
        .await
    {
        Ok(result) => (StatusCode::OK, Json(CompleteStepResponse::from(result))).into_response(),
        Err(err) => error_response(err),
    }
}

/// `POST /wizards/{wizard_id}/complete`
pub async fn complete_wizard(
    RequireAuth(user): RequireAuth,
    State(state): State<WizardAppState>,
    Path(wizard_id): Path<String>,
) -> Response {
    let Ok(wizard_id) = wizard_id.parse::<WizardId>() else {
        return bad_path("wizard id");
    };

    match state
        .complete_wizard_handler()
        .handle(CompleteWizardCommand {
            user_id: user.user_id,
            community_id: user.community_id,
            wizard_id,
        })
        .await
    {
        Ok(result) => (StatusCode::OK, Json(CompleteWizardResponse::from(result))).into_response(),
        Err(err) => error_response(err),
    }
}

/// `PUT /wizards/{wizard_id}/steps/order` (admin)
pub async fn reorder_steps(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<WizardAppState>,
    Path(wizard_id): Path<String>,
    Json(body): Json<ReorderStepsRequest>,
) -> Response {
    let Ok(wizard_id) = wizard_id.parse::<WizardId>() else {
        return bad_path("wizard id");
    };

    let mut ordering = Vec::with_capacity(body.ordering.len());
    for entry in body.ordering {
        let Ok(step_id) = entry.step_id.parse::<StepId>() else {
            return bad_path("step id");
        };
        ordering.push((step_id, entry.position));
    }

    match state
        .reorder_steps_handler()
        .handle(ReorderStepsCommand {
            community_id: admin.community_id,
            wizard_id,
            ordering,
        })
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ReorderStepsResponse::from(result))).into_response(),
        Err(err) => error_response(err),
    }
}
