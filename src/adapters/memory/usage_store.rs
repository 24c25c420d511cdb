//! In-memory usage store for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entitlement::{Feature, UsageEvent};
use crate::domain::foundation::{CommunityId, DomainError, Timestamp};
use crate::ports::{ConsumeOutcome, UsageStore};

/// In-memory implementation of the UsageStore port.
///
/// `consume_within_limit` holds the event-log write lock across the count
/// and the append, which is the in-memory equivalent of the PostgreSQL
/// adapter's single-transaction conditional insert.
pub struct InMemoryUsageStore {
    events: RwLock<Vec<UsageEvent>>,
    active_wizards: RwLock<HashMap<CommunityId, i64>>,
}

impl InMemoryUsageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            active_wizards: RwLock::new(HashMap::new()),
        }
    }

    /// Sets a community's live active-wizard count (test seeding).
    pub async fn set_active_wizards(&self, community_id: CommunityId, count: i64) {
        self.active_wizards
            .write()
            .await
            .insert(community_id, count);
    }
}

impl Default for InMemoryUsageStore {
    fn default() -> Self {
        Self::new()
    }
}

fn count_in_window(
    events: &[UsageEvent],
    community_id: CommunityId,
    feature: Feature,
    since: Timestamp,
) -> i64 {
    events
        .iter()
        .filter(|e| {
            e.community_id == community_id && e.feature == feature && e.occurred_at >= since
        })
        .count() as i64
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn count_events_since(
        &self,
        community_id: CommunityId,
        feature: Feature,
        since: Timestamp,
    ) -> Result<i64, DomainError> {
        let events = self.events.read().await;
        Ok(count_in_window(&events, community_id, feature, since))
    }

    async fn count_active_wizards(&self, community_id: CommunityId) -> Result<i64, DomainError> {
        Ok(self
            .active_wizards
            .read()
            .await
            .get(&community_id)
            .copied()
            .unwrap_or(0))
    }

    async fn record_event(&self, event: &UsageEvent) -> Result<(), DomainError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn consume_within_limit(
        &self,
        event: &UsageEvent,
        since: Timestamp,
        hard_limit: i64,
    ) -> Result<ConsumeOutcome, DomainError> {
        // Write lock held across count + append: no interleaved consumer
        // can observe the same pre-count.
        let mut events = self.events.write().await;
        let current = count_in_window(&events, event.community_id, event.feature, since);
        if current < hard_limit {
            events.push(event.clone());
            Ok(ConsumeOutcome::Recorded {
                usage_after: current + 1,
            })
        } else {
            Ok(ConsumeOutcome::LimitReached {
                current_usage: current,
            })
        }
    }
}
