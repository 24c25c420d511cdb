//! HTTP handlers for entitlement endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::entitlement::{
    CheckQuotaHandler, CheckQuotaQuery, ConsumeQuotaCommand, ConsumeQuotaHandler,
};
use crate::domain::entitlement::{EntitlementError, Feature, QuotaPolicies};
use crate::ports::{PlanReader, UsageStore};

use crate::adapters::http::middleware::RequireAuth;

use super::dto::{ErrorResponse, QuotaDecisionResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing the entitlement module's dependencies.
#[derive(Clone)]
pub struct EntitlementAppState {
    pub plan_reader: Arc<dyn PlanReader>,
    pub usage_store: Arc<dyn UsageStore>,
    pub quota_policies: QuotaPolicies,
}

impl EntitlementAppState {
    /// Create handlers on demand from the shared state.
    pub fn check_quota_handler(&self) -> CheckQuotaHandler {
        CheckQuotaHandler::new(
            self.plan_reader.clone(),
            self.usage_store.clone(),
            self.quota_policies.clone(),
        )
    }

    pub fn consume_quota_handler(&self) -> ConsumeQuotaHandler {
        ConsumeQuotaHandler::new(
            self.plan_reader.clone(),
            self.usage_store.clone(),
            self.quota_policies.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

fn error_response(err: EntitlementError) -> Response {
    match err {
        EntitlementError::UnknownFeature(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("UNKNOWN_FEATURE", err.to_string())),
        )
            .into_response(),
        EntitlementError::CommunityNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("COMMUNITY_NOT_FOUND", err.to_string())),
        )
            .into_response(),
        EntitlementError::Infrastructure(message) => {
            tracing::error!("entitlement endpoint infrastructure error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("INTERNAL_ERROR", "Internal server error")),
            )
                .into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /entitlements/{feature}`
///
/// Pure check: never records usage. Denials are 200 responses with
/// `allowed = false` - quota exhaustion is a first-class result, not an
/// error.
pub async fn check_quota(
    RequireAuth(user): RequireAuth,
    State(state): State<EntitlementAppState>,
    Path(feature): Path<String>,
) -> Response {
    let Some(feature) = Feature::parse(&feature) else {
        return error_response(EntitlementError::unknown_feature(feature));
    };

    match state
        .check_quota_handler()
        .handle(CheckQuotaQuery {
            community_id: user.community_id,
            feature,
        })
        .await
    {
        Ok(decision) => {
            (StatusCode::OK, Json(QuotaDecisionResponse::from(decision))).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// `POST /entitlements/{feature}/consume`
///
/// Atomic check-and-record for rate-based features; degrades to the pure
/// check for count-based ones.
pub async fn consume_quota(
    RequireAuth(user): RequireAuth,
    State(state): State<EntitlementAppState>,
    Path(feature): Path<String>,
) -> Response {
    let Some(feature) = Feature::parse(&feature) else {
        return error_response(EntitlementError::unknown_feature(feature));
    };

    match state
        .consume_quota_handler()
        .handle(ConsumeQuotaCommand {
            community_id: user.community_id,
            user_id: user.user_id,
            feature,
        })
        .await
    {
        Ok(decision) => {
            (StatusCode::OK, Json(QuotaDecisionResponse::from(decision))).into_response()
        }
        Err(err) => error_response(err),
    }
}
