//! HTTP DTOs (Data Transfer Objects) for entitlement endpoints.

use serde::Serialize;

use crate::domain::entitlement::QuotaDecision;

/// Response for quota check and consume endpoints.
///
/// On `allowed = false` this is the complete "upgrade needed" payload: the
/// feature, the plan the limit came from, the limit, and the observed
/// usage.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaDecisionResponse {
    pub feature: String,
    pub allowed: bool,
    pub current_usage: i64,
    /// Null means unlimited.
    pub limit: Option<i64>,
    /// Human-readable window, e.g. "per 30 day(s)" or "current count".
    pub window: String,
    /// Plan the limit was resolved against; null for plan-less communities.
    pub plan_id: Option<String>,
}

impl From<QuotaDecision> for QuotaDecisionResponse {
    fn from(decision: QuotaDecision) -> Self {
        Self {
            feature: decision.feature.as_str().to_string(),
            allowed: decision.allowed,
            current_usage: decision.current_usage,
            limit: decision.limit,
            window: decision.window_description(),
            plan_id: decision.plan_id.map(|id| id.to_string()),
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{Feature, QuotaWindow};
    use crate::domain::foundation::PlanId;
    use serde_json::json;

    #[test]
    fn denial_payload_carries_upgrade_prompt_data() {
        let plan_id = PlanId::new();
        let decision = QuotaDecision {
            feature: Feature::ImageGeneration,
            allowed: false,
            current_usage: 5,
            limit: Some(5),
            window: QuotaWindow::trailing_days(30),
            plan_id: Some(plan_id),
        };

        let body = serde_json::to_value(QuotaDecisionResponse::from(decision)).unwrap();
        assert_eq!(body["feature"], json!("image_generation"));
        assert_eq!(body["allowed"], json!(false));
        assert_eq!(body["current_usage"], json!(5));
        assert_eq!(body["limit"], json!(5));
        assert_eq!(body["window"], json!("per 30 day(s)"));
        assert_eq!(body["plan_id"], json!(plan_id.to_string()));
    }

    #[test]
    fn unlimited_decision_serializes_null_limit() {
        let decision = QuotaDecision {
            feature: Feature::AiChatMessage,
            allowed: true,
            current_usage: 0,
            limit: None,
            window: QuotaWindow::INSTANT,
            plan_id: None,
        };

        let body = serde_json::to_value(QuotaDecisionResponse::from(decision)).unwrap();
        assert_eq!(body["limit"], json!(null));
        assert_eq!(body["plan_id"], json!(null));
    }
}
