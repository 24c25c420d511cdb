//! CheckQuotaHandler - Query handler for the pure quota check.

use std::sync::Arc;

use crate::domain::entitlement::{
    evaluate_quota, EntitlementError, Feature, LimitPolicy, QuotaDecision, QuotaPolicies,
};
use crate::domain::foundation::{CommunityId, Timestamp};
use crate::ports::{PlanReader, UsageStore};

/// Query to check whether one more consumption of a feature is allowed.
#[derive(Debug, Clone)]
pub struct CheckQuotaQuery {
    pub community_id: CommunityId,
    pub feature: Feature,
}

/// Handler for the read-only quota check.
///
/// Never records usage - the consume path owns that (see
/// `ConsumeQuotaHandler`). Unlimited features short-circuit with usage 0
/// rather than paying for a count nothing would compare against.
pub struct CheckQuotaHandler {
    plans: Arc<dyn PlanReader>,
    usage: Arc<dyn UsageStore>,
    policies: QuotaPolicies,
}

impl CheckQuotaHandler {
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
        query: CheckQuotaQuery,
    ) -> Result<QuotaDecision, EntitlementError> {
        // 1. Resolve the community's plan; no plan is the sentinel state,
        //    not an error
        let plan = self
            .plans
            .current_plan(query.community_id)
            .await
            .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
        let plan_id = plan.map(|p| p.id);

        // 2. Resolve the limit row and the missing-row policy
        let limit = self
            .plans
            .find_limit(plan_id, query.feature)
            .await
            .map_err(|e| EntitlementError::infrastructure(e.to_string()))?;
        let policy = self.policies.policy_for(query.feature);

        // 3. Aggregate usage for the window actually being gated
        let current_usage = match &limit {
            Some(row) if row.window.is_instant() => self
                .usage
                .count_active_wizards(query.community_id)
                .await
                .map_err(|e| EntitlementError::infrastructure(e.to_string()))?,
            Some(row) => {
                let since = Timestamp::now().minus_secs(row.window.as_secs());
                self.usage
                    .count_events_since(query.community_id, query.feature, since)
                    .await
                    .map_err(|e| EntitlementError::infrastructure(e.to_string()))?
            }
            // No row: fail-closed features still report the live count so
            // the denial payload is truthful; fail-open skips the count.
            None if policy == LimitPolicy::FailClosed => self
                .usage
                .count_active_wizards(query.community_id)
                .await
                .map_err(|e| EntitlementError::infrastructure(e.to_string()))?,
            None => 0,
        };

        // 4. Decide
        let decision = evaluate_quota(query.feature, plan_id, limit.as_ref(), policy, current_usage);

        if !decision.allowed {
            tracing::info!(
                community_id = %query.community_id,
                feature = %query.feature,
                current_usage = decision.current_usage,
                limit = ?decision.limit,
                "quota check denied"
            );
        }

        Ok(decision)
    }
}
