//! Integration tests for entitlement HTTP endpoints.
//!
//! These tests drive the assembled API router end to end against in-memory
//! adapters and a mock token verifier:
//! 1. Pure quota checks (allowed and denied payloads)
//! 2. Atomic consume flow up to and past the limit
//! 3. The per-feature missing-row defaults (fail-open vs fail-closed)
//! 4. Unknown feature rejection

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use waypost::adapters::auth::MockTokenVerifier;
use waypost::adapters::http::api_router;
use waypost::adapters::http::entitlement::EntitlementAppState;
use waypost::adapters::http::middleware::AuthState;
use waypost::adapters::http::wizard::WizardAppState;
use waypost::adapters::memory::{
    InMemoryPlanReader, InMemoryProgressRepository, InMemoryStepRepository,
    InMemoryStepTypeReader, InMemoryUsageStore, InMemoryWizardRepository,
};
use waypost::domain::entitlement::{
    Feature, Plan, PlanCode, PlanLimit, QuotaPolicies, QuotaWindow, UsageEvent,
};
use waypost::domain::foundation::{AuthenticatedUser, CommunityId, PlanId, Timestamp, UserId};
use waypost::ports::UsageStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    app: Router,
    plans: Arc<InMemoryPlanReader>,
    usage: Arc<InMemoryUsageStore>,
    community_id: CommunityId,
    plan_id: PlanId,
}

const USER_TOKEN: &str = "member-token";

async fn test_app() -> TestApp {
    let community_id = CommunityId::new();

    let plans = Arc::new(InMemoryPlanReader::new());
    let plan = Plan {
        id: PlanId::new(),
        code: PlanCode::Free,
        name: "Free".to_string(),
        price_cents: 0,
        stripe_price_id: None,
        is_active: true,
    };
    let plan_id = plan.id;
    plans.insert_plan(community_id, plan).await;

    let usage = Arc::new(InMemoryUsageStore::new());

    let wizard_state = WizardAppState {
        wizard_repository: Arc::new(InMemoryWizardRepository::new()),
        step_repository: Arc::new(InMemoryStepRepository::new()),
        step_type_reader: Arc::new(InMemoryStepTypeReader::new()),
        progress_repository: Arc::new(InMemoryProgressRepository::new()),
    };
    let entitlement_state = EntitlementAppState {
        plan_reader: plans.clone(),
        usage_store: usage.clone(),
        quota_policies: QuotaPolicies::with_defaults(),
    };

    let verifier: AuthState = Arc::new(MockTokenVerifier::new().with_user(
        USER_TOKEN,
        AuthenticatedUser::new(UserId::new("member-1").unwrap(), community_id, false),
    ));

    TestApp {
        app: api_router(wizard_state, entitlement_state, verifier),
        plans,
        usage,
        community_id,
        plan_id,
    }
}

impl TestApp {
    async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token).await
    }

    async fn post(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("POST", path, token).await
    }

    async fn request(&self, method: &str, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let response = self
            .app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn add_limit(&self, feature: Feature, window: QuotaWindow, hard_limit: i64) {
        self.plans
            .insert_limit(PlanLimit {
                plan_id: Some(self.plan_id),
                feature,
                window,
                hard_limit,
            })
            .await;
    }
}

// =============================================================================
// Pure Check
// =============================================================================

#[tokio::test]
async fn entitlement_endpoints_require_authentication() {
    let t = test_app().await;
    let (status, _) = t.get("/api/entitlements/image_generation", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_feature_is_bad_request() {
    let t = test_app().await;
    let (status, body) = t
        .get("/api/entitlements/video_generation", Some(USER_TOKEN))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("UNKNOWN_FEATURE"));
}

#[tokio::test]
async fn check_within_limit_is_allowed() {
    let t = test_app().await;
    t.add_limit(Feature::ImageGeneration, QuotaWindow::trailing_days(30), 5)
        .await;

    let (status, body) = t
        .get("/api/entitlements/image_generation", Some(USER_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], json!(true));
    assert_eq!(body["current_usage"], json!(0));
    assert_eq!(body["limit"], json!(5));
}

#[tokio::test]
async fn exhausted_quota_is_denied_with_upgrade_payload() {
    let t = test_app().await;
    t.add_limit(Feature::ImageGeneration, QuotaWindow::trailing_days(30), 5)
        .await;

    // Five generations already recorded inside the window.
    for _ in 0..5 {
        t.usage
            .record_event(&UsageEvent {
                community_id: t.community_id,
                user_id: UserId::new("member-1").unwrap(),
                feature: Feature::ImageGeneration,
                occurred_at: Timestamp::now(),
            })
            .await
            .unwrap();
    }

    let (status, body) = t
        .get("/api/entitlements/image_generation", Some(USER_TOKEN))
        .await;

    // Denial is a first-class 200 result, not an error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], json!(false));
    assert_eq!(body["feature"], json!("image_generation"));
    assert_eq!(body["current_usage"], json!(5));
    assert_eq!(body["limit"], json!(5));
    assert_eq!(body["window"], json!("per 30 day(s)"));
    assert_eq!(body["plan_id"], json!(t.plan_id.to_string()));
}

#[tokio::test]
async fn missing_row_fails_open_for_generic_features() {
    let t = test_app().await;
    let (status, body) = t
        .get("/api/entitlements/ai_chat_message", Some(USER_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], json!(true));
    assert_eq!(body["limit"], json!(null));
}

#[tokio::test]
async fn missing_row_fails_closed_for_active_wizard() {
    let t = test_app().await;
    let (status, body) = t
        .get("/api/entitlements/active_wizard", Some(USER_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], json!(false));
    assert_eq!(body["limit"], json!(0));
}

#[tokio::test]
async fn active_wizard_check_counts_live_wizards() {
    let t = test_app().await;
    t.add_limit(Feature::ActiveWizard, QuotaWindow::INSTANT, 2).await;
    t.usage.set_active_wizards(t.community_id, 2).await;

    let (status, body) = t
        .get("/api/entitlements/active_wizard", Some(USER_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], json!(false));
    assert_eq!(body["current_usage"], json!(2));
    assert_eq!(body["window"], json!("current count"));
}

// =============================================================================
// Consume
// =============================================================================

#[tokio::test]
async fn consume_allows_until_the_limit_then_denies() {
    let t = test_app().await;
    t.add_limit(Feature::AiChatMessage, QuotaWindow::trailing_days(1), 2)
        .await;

    for expected in [0, 1] {
        let (status, body) = t
            .post("/api/entitlements/ai_chat_message/consume", Some(USER_TOKEN))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allowed"], json!(true));
        assert_eq!(body["current_usage"], json!(expected));
    }

    let (status, body) = t
        .post("/api/entitlements/ai_chat_message/consume", Some(USER_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], json!(false));
    assert_eq!(body["current_usage"], json!(2));

    // The denied attempt did not append an event.
    let since = Timestamp::now().minus_days(1);
    assert_eq!(
        t.usage
            .count_events_since(t.community_id, Feature::AiChatMessage, since)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn consume_of_unlimited_feature_records_and_allows() {
    let t = test_app().await;
    let (status, body) = t
        .post("/api/entitlements/image_generation/consume", Some(USER_TOKEN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], json!(true));
    assert_eq!(body["limit"], json!(null));

    let since = Timestamp::now().minus_days(1);
    assert_eq!(
        t.usage
            .count_events_since(t.community_id, Feature::ImageGeneration, since)
            .await
            .unwrap(),
        1
    );
}
