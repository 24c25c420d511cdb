//! UsageStore port - usage aggregation and atomic consumption.
//!
//! # Design
//!
//! The pure check reads a count and never writes. The consume path is the
//! check-then-act hazard: two concurrent requests both observing
//! `usage = limit - 1` would both write. `consume_within_limit` closes the
//! race by scoping the count and the insert in ONE database transaction
//! (conditional insert), which is the correctness mechanism - not
//! application-level mutexes, since requests may land on different server
//! processes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entitlement::{Feature, UsageEvent};
use crate::domain::foundation::{CommunityId, DomainError, Timestamp};

/// Outcome of an atomic consume attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeOutcome {
    /// The event was recorded; `usage_after` includes it.
    Recorded { usage_after: i64 },
    /// The quota was exhausted; nothing was recorded.
    LimitReached { current_usage: i64 },
}

/// Port for usage-event aggregation and recording.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Counts usage events for (community, feature) with
    /// `occurred_at >= since`.
    async fn count_events_since(
        &self,
        community_id: CommunityId,
        feature: Feature,
        since: Timestamp,
    ) -> Result<i64, DomainError>;

    /// Counts the community's currently active wizards. This is the
    /// `time_window = 0` usage figure for `active_wizard` - a live count,
    /// not an event-log aggregate.
    async fn count_active_wizards(&self, community_id: CommunityId) -> Result<i64, DomainError>;

    /// Appends one usage event unconditionally.
    ///
    /// Used on the fail-open path where no limit gates the feature; gated
    /// consumption goes through `consume_within_limit`.
    async fn record_event(&self, event: &UsageEvent) -> Result<(), DomainError>;

    /// Atomically records `event` iff the trailing-window count is below
    /// `hard_limit`.
    ///
    /// The count (events with `occurred_at >= since`) and the insert happen
    /// in a single transaction so concurrent consumers cannot both pass the
    /// gate at `usage = hard_limit - 1`.
    async fn consume_within_limit(
        &self,
        event: &UsageEvent,
        since: Timestamp,
        hard_limit: i64,
    ) -> Result<ConsumeOutcome, DomainError>;
}
