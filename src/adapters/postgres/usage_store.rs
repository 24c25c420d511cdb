//! PostgreSQL implementation of UsageStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entitlement::{Feature, UsageEvent};
use crate::domain::foundation::{CommunityId, DomainError, ErrorCode, Timestamp};
use crate::ports::{ConsumeOutcome, UsageStore};

/// PostgreSQL implementation of the UsageStore port.
///
/// `consume_within_limit` serializes concurrent consumers of one
/// (community, feature) pair with a transaction-scoped advisory lock, then
/// counts and conditionally inserts inside that transaction. Requests from
/// different server processes contend on the same database lock, so no
/// application-level mutex is involved.
pub struct PostgresUsageStore {
    pool: PgPool,
}

impl PostgresUsageStore {
    /// Creates a new PostgresUsageStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageStore for PostgresUsageStore {
    async fn count_events_since(
        &self,
        community_id: CommunityId,
        feature: Feature,
        since: Timestamp,
    ) -> Result<i64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM usage_events \
             WHERE community_id = $1 AND feature = $2 AND occurred_at >= $3",
        )
        .bind(community_id.as_uuid())
        .bind(feature.as_str())
        .bind(*since.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count usage events: {}", e),
            )
        })?;

        Ok(count)
    }

    async fn count_active_wizards(&self, community_id: CommunityId) -> Result<i64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM wizards WHERE community_id = $1 AND is_active = TRUE",
        )
        .bind(community_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count active wizards: {}", e),
            )
        })?;

        Ok(count)
    }

    async fn record_event(&self, event: &UsageEvent) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO usage_events (community_id, user_id, feature, occurred_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(event.community_id.as_uuid())
        .bind(event.user_id.as_str())
        .bind(event.feature.as_str())
        .bind(*event.occurred_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record usage event: {}", e),
            )
        })?;

        Ok(())
    }

    async fn consume_within_limit(
        &self,
        event: &UsageEvent,
        since: Timestamp,
        hard_limit: i64,
    ) -> Result<ConsumeOutcome, DomainError> {
        let db_err = |e: sqlx::Error| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to consume usage quota: {}", e),
            )
        };

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Advisory xact lock keyed on (community, feature): two consumers
        // of the same quota cannot run this block concurrently, which is
        // what makes the count-then-insert safe under READ COMMITTED. The
        // lock releases at commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1 || ':' || $2, 0))")
            .bind(event.community_id.as_uuid().to_string())
            .bind(event.feature.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let (current,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM usage_events \
             WHERE community_id = $1 AND feature = $2 AND occurred_at >= $3",
        )
        .bind(event.community_id.as_uuid())
        .bind(event.feature.as_str())
        .bind(*since.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        if current >= hard_limit {
            tx.rollback().await.map_err(db_err)?;
            return Ok(ConsumeOutcome::LimitReached {
                current_usage: current,
            });
        }

        sqlx::query(
            "INSERT INTO usage_events (community_id, user_id, feature, occurred_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(event.community_id.as_uuid())
        .bind(event.user_id.as_str())
        .bind(event.feature.as_str())
        .bind(*event.occurred_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(ConsumeOutcome::Recorded {
            usage_after: current + 1,
        })
    }
}
