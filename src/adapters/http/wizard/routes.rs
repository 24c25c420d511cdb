//! Axum router configuration for wizard progression endpoints.
//!
//! This module defines the route structure for the wizard API and wires it
//! to the corresponding handlers.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    complete_step, complete_wizard, get_step_status, reorder_steps, WizardAppState,
};

/// Create the wizard API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `GET /{wizard_id}/steps/status` - Per-step pass status for the caller
/// - `POST /{wizard_id}/steps/{step_id}/complete` - Record a completion attempt
/// - `POST /{wizard_id}/complete` - Complete the wizard
///
/// ## Admin Endpoints (require community admin role)
/// - `PUT /{wizard_id}/steps/order` - Atomically reorder the wizard's steps
pub fn wizard_routes() -> Router<WizardAppState> {
    Router::new()
        // User endpoints
        .route("/:wizard_id/steps/status", get(get_step_status))
        .route(
            "/:wizard_id/steps/:step_id/complete",
            post(complete_step),
        )
        .route("/:wizard_id/complete", post(complete_wizard))
        // Admin endpoints
        .route("/:wizard_id/steps/order", put(reorder_steps))
}

/// Create the complete wizard module router, suitable for mounting at
/// `/api/wizards`.
pub fn wizard_router() -> Router<WizardAppState> {
    Router::new().nest("/wizards", wizard_routes())
}
