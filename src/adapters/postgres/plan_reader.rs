//! PostgreSQL implementation of PlanReader.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::{Feature, Plan, PlanCode, PlanLimit, QuotaWindow};
use crate::domain::foundation::{CommunityId, DomainError, ErrorCode, PlanId};
use crate::ports::PlanReader;

/// PostgreSQL implementation of the PlanReader port.
pub struct PostgresPlanReader {
    pool: PgPool,
}

impl PostgresPlanReader {
    /// Creates a new PostgresPlanReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a plan.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    code: String,
    name: String,
    price_cents: i64,
    stripe_price_id: Option<String>,
    is_active: bool,
}

fn parse_code(s: &str) -> Result<PlanCode, DomainError> {
    PlanCode::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid plan code value: {}", s),
        )
    })
}

impl TryFrom<PlanRow> for Plan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(Plan {
            id: PlanId::from_uuid(row.id),
            code: parse_code(&row.code)?,
            name: row.name,
            price_cents: row.price_cents,
            stripe_price_id: row.stripe_price_id,
            is_active: row.is_active,
        })
    }
}

/// Database row representation of a plan limit.
#[derive(Debug, sqlx::FromRow)]
struct PlanLimitRow {
    plan_id: Option<Uuid>,
    feature: String,
    time_window_secs: i64,
    hard_limit: i64,
}

fn parse_feature(s: &str) -> Result<Feature, DomainError> {
    Feature::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid feature value: {}", s),
        )
    })
}

impl TryFrom<PlanLimitRow> for PlanLimit {
    type Error = DomainError;

    fn try_from(row: PlanLimitRow) -> Result<Self, Self::Error> {
        Ok(PlanLimit {
            plan_id: row.plan_id.map(PlanId::from_uuid),
            feature: parse_feature(&row.feature)?,
            window: QuotaWindow::trailing_secs(row.time_window_secs.max(0) as u64),
            hard_limit: row.hard_limit,
        })
    }
}

#[async_trait]
impl PlanReader for PostgresPlanReader {
    async fn current_plan(
        &self,
        community_id: CommunityId,
    ) -> Result<Option<Plan>, DomainError> {
        // Communities with current_plan_id NULL resolve to no plan; the
        // join simply produces no row.
        let row: Option<PlanRow> = sqlx::query_as(
            "SELECT p.id, p.code, p.name, p.price_cents, p.stripe_price_id, p.is_active \
             FROM communities c \
             JOIN plans p ON p.id = c.current_plan_id \
             WHERE c.id = $1",
        )
        .bind(community_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to resolve current plan: {}", e),
            )
        })?;

        row.map(Plan::try_from).transpose()
    }

    async fn find_limit(
        &self,
        plan_id: Option<PlanId>,
        feature: Feature,
    ) -> Result<Option<PlanLimit>, DomainError> {
        // IS NOT DISTINCT FROM lets the NULL sentinel ("no plan") match its
        // own limit rows. At most one gating row per (plan, feature) is
        // expected; the instantaneous row wins if both exist.
        let row: Option<PlanLimitRow> = sqlx::query_as(
            "SELECT plan_id, feature, time_window_secs, hard_limit \
             FROM plan_limits \
             WHERE plan_id IS NOT DISTINCT FROM $1 AND feature = $2 \
             ORDER BY time_window_secs ASC \
             LIMIT 1",
        )
        .bind(plan_id.map(|id| *id.as_uuid()))
        .bind(feature.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to resolve plan limit: {}", e),
            )
        })?;

        row.map(PlanLimit::try_from).transpose()
    }
}
