//! In-memory plan reference data for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entitlement::{Feature, Plan, PlanLimit};
use crate::domain::foundation::{CommunityId, DomainError, PlanId};
use crate::ports::PlanReader;

/// In-memory implementation of the PlanReader port.
pub struct InMemoryPlanReader {
    plans: RwLock<HashMap<CommunityId, Plan>>,
    limits: RwLock<Vec<PlanLimit>>,
}

impl InMemoryPlanReader {
    /// Creates an empty reader: every community resolves to "no plan" and
    /// every limit lookup misses.
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
            limits: RwLock::new(Vec::new()),
        }
    }

    /// Assigns a community's current plan (test seeding).
    pub async fn insert_plan(&self, community_id: CommunityId, plan: Plan) {
        self.plans.write().await.insert(community_id, plan);
    }

    /// Adds a limit row (test seeding).
    pub async fn insert_limit(&self, limit: PlanLimit) {
        self.limits.write().await.push(limit);
    }
}

impl Default for InMemoryPlanReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanReader for InMemoryPlanReader {
    async fn current_plan(
        &self,
        community_id: CommunityId,
    ) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.read().await.get(&community_id).cloned())
    }

    async fn find_limit(
        &self,
        plan_id: Option<PlanId>,
        feature: Feature,
    ) -> Result<Option<PlanLimit>, DomainError> {
        Ok(self
            .limits
            .read()
            .await
            .iter()
            .find(|limit| limit.plan_id == plan_id && limit.feature == feature)
            .cloned())
    }
}
