//! PlanReader port - plan and plan-limit reference data.

use async_trait::async_trait;

use crate::domain::entitlement::{Feature, Plan, PlanLimit};
use crate::domain::foundation::{CommunityId, DomainError, PlanId};

/// Port for resolving a community's plan and its feature limits.
#[async_trait]
pub trait PlanReader: Send + Sync {
    /// Resolves the community's current plan. `None` means the community
    /// has no current plan; limit lookup then uses the sentinel "no plan"
    /// state rather than failing.
    async fn current_plan(&self, community_id: CommunityId)
        -> Result<Option<Plan>, DomainError>;

    /// Finds the limit row for `(plan_id, feature)`.
    ///
    /// `plan_id = None` matches rows configured for the sentinel "no plan"
    /// state. A missing row is resolved by the feature's `LimitPolicy`, not
    /// here - readers return `None` verbatim.
    async fn find_limit(
        &self,
        plan_id: Option<PlanId>,
        feature: Feature,
    ) -> Result<Option<PlanLimit>, DomainError>;
}
