//! Axum router configuration for entitlement endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{check_quota, consume_quota, EntitlementAppState};

/// Create the entitlement API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `GET /{feature}` - Pure quota check for the caller's community
/// - `POST /{feature}/consume` - Atomic check-and-record
pub fn entitlement_routes() -> Router<EntitlementAppState> {
    Router::new()
        .route("/:feature", get(check_quota))
        .route("/:feature/consume", post(consume_quota))
}

/// Create the complete entitlement module router, suitable for mounting at
/// `/api/entitlements`.
pub fn entitlement_router() -> Router<EntitlementAppState> {
    Router::new().nest("/entitlements", entitlement_routes())
}
