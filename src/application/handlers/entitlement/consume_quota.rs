//! ConsumeQuotaHandler - Command handler for atomic check-and-record.
//!
//! This is the strengthened consume path: for rate-based features the count
//! and the usage-event insert happen in ONE store transaction, so two
//! concurrent requests can no longer both pass the gate at
//! `usage = limit - 1`. Callers observe the same allowed/denied semantics
//! as the pure check.

use std::sync::Arc;

use crate::domain::entitlement::{
    evaluate_quota, EntitlementError, Feature, LimitPolicy, QuotaDecision, QuotaPolicies,
    UsageEvent,
};
use crate::domain::foundation::{CommunityId, Timestamp, UserId};
use crate::ports::{ConsumeOutcome, PlanReader, UsageStore};

/// Command to consume one unit of a feature's quota.
#[derive(Debug, Clone)]
pub struct ConsumeQuotaCommand {
    pub community_id: CommunityId,
    pub user_id: UserId,
    pub feature: Feature,
}

/// Handler for gated consumption.
///
/// Count-based features (`time_window = 0`, i.e. `active_wizard`) have no
/// usage event to append - the activation write itself is the consumption -
/// so for those this handler degrades to the pure check and the caller
/// performs the activation under the same decision.
pub struct ConsumeQuotaHandler {
    plans: Arc<dyn PlanReader>,
    usage: Arc<dyn UsageStore>,
    policies: QuotaPolicies,
}

impl ConsumeQuotaHandler {
    pub fn new(
        plans: Arc<dyn PlanReader>,
        usage: Arc<dyn UsageStore>,
        policies: QuotaPolicies,
    ) -> Self {
        Self {
            plans,
            usage,
            policies,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConsumeQuotaCommand,
    ) -> Result<QuotaDecision, EntitlementError> {
        // 1. Resolve plan and limit row
        let plan = self
            .plans
            .current_plan(cmd.community_id)
            .await
            .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
        let plan_id = plan.map(|p| p.id);

        let limit = self
            .plans
            .find_limit(plan_id, cmd.feature)
            .await
            .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
        let policy = self.policies.policy_for(cmd.feature);

        let now = Timestamp::now();
        let event = UsageEvent {
            community_id: cmd.community_id,
            user_id: cmd.user_id.clone(),
            feature: cmd.feature,
            occurred_at: now,
        };

        let decision = match &limit {
            // 2a. Unlimited (fail-open, no row): record and allow
            None if policy == LimitPolicy::FailOpen => {
                self.usage
                    .record_event(&event)
                    .await
                    .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
                evaluate_quota(cmd.feature, plan_id, None, policy, 0)
            }

            // 2b. Fail-closed with no row: denied, nothing recorded
            None => {
                let current = self
                    .usage
                    .count_active_wizards(cmd.community_id)
                    .await
                    .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
                evaluate_quota(cmd.feature, plan_id, None, policy, current)
            }

            // 2c. Count-based limit: pure check, the activation write is
            //     the consumption
            Some(row) if row.window.is_instant() => {
                let current = self
                    .usage
                    .count_active_wizards(cmd.community_id)
                    .await
                    .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
                evaluate_quota(cmd.feature, plan_id, Some(row), policy, current)
            }

            // 2d. Rate-based limit: atomic conditional insert
            Some(row) => {
                let since = now.minus_secs(row.window.as_secs());
                let outcome = self
                    .usage
                    .consume_within_limit(&event, since, row.hard_limit)
                    .await
                    .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
                let current_usage = match outcome {
                    // Usage as observed at decision time, before this event.
                    ConsumeOutcome::Recorded { usage_after } => usage_after - 1,
                    ConsumeOutcome::LimitReached { current_usage } => current_usage,
                };
                evaluate_quota(cmd.feature, plan_id, Some(row), policy, current_usage)
            }
        };

        if !decision.allowed {
            tracing::info!(
                community_id = %cmd.community_id,
                feature = %cmd.feature,
                current_usage = decision.current_usage,
                limit = ?decision.limit,
                "quota consume denied"
            );
        }

        Ok(decision)
    }
}
