//! PostgreSQL implementation of ProgressRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, StepId, Timestamp, UserId, WizardId,
};
use crate::domain::progression::UserStepProgress;
use crate::ports::ProgressRepository;

/// PostgreSQL implementation of the ProgressRepository port.
///
/// Writes go through a single `INSERT ... ON CONFLICT DO UPDATE` keyed on
/// `(user_id, wizard_id, step_id)`: concurrent completions of the same step
/// by the same user serialize on the conflict target and the final row is
/// last-writer-wins. Never a read-then-write pair.
pub struct PostgresProgressRepository {
    pool: PgPool,
}

impl PostgresProgressRepository {
    /// Creates a new PostgresProgressRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a progress record.
#[derive(Debug, sqlx::FromRow)]
struct ProgressRow {
    user_id: String,
    wizard_id: Uuid,
    step_id: Uuid,
    completed_at: Option<DateTime<Utc>>,
    verified_data: Option<serde_json::Value>,
}

impl TryFrom<ProgressRow> for UserStepProgress {
    type Error = DomainError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        Ok(UserStepProgress {
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            wizard_id: WizardId::from_uuid(row.wizard_id),
            step_id: StepId::from_uuid(row.step_id),
            completed_at: row.completed_at.map(Timestamp::from_datetime),
            verified_data: row.verified_data,
        })
    }
}

const PROGRESS_COLUMNS: &str = "user_id, wizard_id, step_id, completed_at, verified_data";

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn upsert(&self, progress: &UserStepProgress) -> Result<UserStepProgress, DomainError> {
        let query = format!(
            "INSERT INTO user_step_progress (user_id, wizard_id, step_id, completed_at, verified_data) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, wizard_id, step_id) \
             DO UPDATE SET completed_at = EXCLUDED.completed_at, \
                           verified_data = EXCLUDED.verified_data \
             RETURNING {PROGRESS_COLUMNS}"
        );
        let row: ProgressRow = sqlx::query_as(&query)
            .bind(progress.user_id.as_str())
            .bind(progress.wizard_id.as_uuid())
            .bind(progress.step_id.as_uuid())
            .bind(progress.completed_at.map(|t| *t.as_datetime()))
            .bind(&progress.verified_data)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to upsert progress: {}", e),
                )
            })?;

        row.try_into()
    }

    async fn find(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
        step_id: StepId,
    ) -> Result<Option<UserStepProgress>, DomainError> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_step_progress \
             WHERE user_id = $1 AND wizard_id = $2 AND step_id = $3"
        );
        let row: Option<ProgressRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .bind(wizard_id.as_uuid())
            .bind(step_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to load progress: {}", e),
                )
            })?;

        row.map(UserStepProgress::try_from).transpose()
    }

    async fn list_for_wizard(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
    ) -> Result<Vec<UserStepProgress>, DomainError> {
        let query = format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_step_progress \
             WHERE user_id = $1 AND wizard_id = $2"
        );
        let rows: Vec<ProgressRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .bind(wizard_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to list progress: {}", e),
                )
            })?;

        rows.into_iter().map(UserStepProgress::try_from).collect()
    }
}
