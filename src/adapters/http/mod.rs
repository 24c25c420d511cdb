//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod entitlement;
pub mod middleware;
pub mod wizard;

use axum::{middleware as axum_middleware, routing::get, Json, Router};

use self::entitlement::{entitlement_routes, EntitlementAppState};
use self::middleware::{auth_middleware, AuthState};
use self::wizard::{wizard_routes, WizardAppState};

// Re-export key types for convenience
pub use entitlement::entitlement_router;
pub use wizard::wizard_router;

/// Liveness probe. Sits outside the auth layer; deployment probes send no
/// tokens.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Assembles the full API router.
///
/// - `/health` - unauthenticated liveness probe
/// - `/api/wizards/...` - wizard progression endpoints
/// - `/api/entitlements/...` - quota endpoints
///
/// Authenticated routes sit behind the bearer-token middleware; transport
/// layers (trace, cors, timeout, compression) are applied by the binary so
/// tests can drive this router directly.
pub fn api_router(
    wizard_state: WizardAppState,
    entitlement_state: EntitlementAppState,
    verifier: AuthState,
) -> Router {
    let api = Router::new()
        .nest("/wizards", wizard_routes().with_state(wizard_state))
        .nest(
            "/entitlements",
            entitlement_routes().with_state(entitlement_state),
        )
        .layer(axum_middleware::from_fn_with_state(verifier, auth_middleware));

    Router::new().route("/health", get(health)).nest("/api", api)
}
