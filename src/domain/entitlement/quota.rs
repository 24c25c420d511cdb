//! The pure quota decision.
//!
//! Given the resolved limit row (or its absence plus the feature's policy)
//! and the observed usage, decide whether one more consumption is allowed.
//! The decision is read-only; recording the usage event belongs to the
//! caller, ideally inside the same database transaction as the count (see
//! `UsageStore::consume_within_limit`).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CommunityId, PlanId, Timestamp, UserId};

use super::{Feature, LimitPolicy, PlanLimit, QuotaWindow};

/// A usage event recorded when a rate-based feature is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub community_id: CommunityId,
    pub user_id: UserId,
    pub feature: Feature,
    pub occurred_at: Timestamp,
}

/// Outcome of a quota check.
///
/// On denial this carries everything the client needs to render an upgrade
/// prompt: the feature, the plan, the limit, and the observed usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDecision {
    pub feature: Feature,
    pub allowed: bool,
    pub current_usage: i64,
    /// `None` means unlimited (fail-open feature with no limit row).
    pub limit: Option<i64>,
    pub window: QuotaWindow,
    /// The plan the limit was resolved against; `None` for communities
    /// without a current plan.
    pub plan_id: Option<PlanId>,
}

impl QuotaDecision {
    /// Human-readable window description for the denial payload.
    pub fn window_description(&self) -> String {
        self.window.description()
    }
}

/// Decides whether one more consumption of `feature` is allowed.
///
/// `limit` is the limit row resolved for `(plan, feature)`, if any;
/// `policy` is the feature's missing-row default. The gate is strict
/// less-than: the action being gated would be the `usage + 1`-th event, so
/// `usage == hard_limit` means the quota is already exhausted.
pub fn evaluate_quota(
    feature: Feature,
    plan_id: Option<PlanId>,
    limit: Option<&PlanLimit>,
    policy: LimitPolicy,
    current_usage: i64,
) -> QuotaDecision {
    match limit {
        Some(limit) => QuotaDecision {
            feature,
            allowed: current_usage < limit.hard_limit,
            current_usage,
            limit: Some(limit.hard_limit),
            window: limit.window,
            plan_id,
        },
        None => match policy {
            LimitPolicy::FailOpen => QuotaDecision {
                feature,
                allowed: true,
                current_usage,
                limit: None,
                window: QuotaWindow::INSTANT,
                plan_id,
            },
            LimitPolicy::FailClosed => QuotaDecision {
                feature,
                allowed: false,
                current_usage,
                limit: Some(0),
                window: QuotaWindow::INSTANT,
                plan_id,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn limit_row(hard_limit: i64, window: QuotaWindow) -> PlanLimit {
        PlanLimit {
            plan_id: Some(PlanId::new()),
            feature: Feature::ImageGeneration,
            window,
            hard_limit,
        }
    }

    #[test]
    fn usage_below_limit_is_allowed() {
        let limit = limit_row(5, QuotaWindow::trailing_days(30));
        let decision = evaluate_quota(
            Feature::ImageGeneration,
            limit.plan_id,
            Some(&limit),
            LimitPolicy::FailOpen,
            4,
        );
        assert!(decision.allowed);
        assert_eq!(decision.limit, Some(5));
        assert_eq!(decision.current_usage, 4);
    }

    #[test]
    fn usage_at_limit_is_denied() {
        let limit = limit_row(5, QuotaWindow::trailing_days(30));
        let decision = evaluate_quota(
            Feature::ImageGeneration,
            limit.plan_id,
            Some(&limit),
            LimitPolicy::FailOpen,
            5,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.current_usage, 5);
    }

    #[test]
    fn missing_row_fails_open_for_generic_features() {
        let decision = evaluate_quota(
            Feature::AiChatMessage,
            None,
            None,
            LimitPolicy::FailOpen,
            1_000_000,
        );
        assert!(decision.allowed);
        assert_eq!(decision.limit, None);
    }

    #[test]
    fn missing_row_fails_closed_for_active_wizard() {
        let decision = evaluate_quota(
            Feature::ActiveWizard,
            None,
            None,
            LimitPolicy::FailClosed,
            0,
        );
        assert!(!decision.allowed);
        assert_eq!(decision.limit, Some(0));
    }

    #[test]
    fn zero_limit_row_denies_even_first_use() {
        let limit = limit_row(0, QuotaWindow::INSTANT);
        let decision = evaluate_quota(
            Feature::ActiveWizard,
            limit.plan_id,
            Some(&limit),
            LimitPolicy::FailClosed,
            0,
        );
        assert!(!decision.allowed);
    }

    proptest! {
        /// The gate is exactly `usage < hard_limit` whenever a row exists.
        #[test]
        fn gate_is_strict_less_than(
            hard_limit in 0i64..1000,
            usage in 0i64..1000,
        ) {
            let limit = limit_row(hard_limit, QuotaWindow::trailing_days(1));
            let decision = evaluate_quota(
                Feature::ImageGeneration,
                limit.plan_id,
                Some(&limit),
                LimitPolicy::FailOpen,
                usage,
            );
            prop_assert_eq!(decision.allowed, usage < hard_limit);
        }

        /// Fail-open decisions are allowed at any usage level.
        #[test]
        fn fail_open_never_denies(usage in 0i64..1_000_000) {
            let decision = evaluate_quota(
                Feature::AiChatMessage,
                None,
                None,
                LimitPolicy::FailOpen,
                usage,
            );
            prop_assert!(decision.allowed);
        }
    }
}
