//! PostgreSQL implementation of WizardRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CommunityId, DomainError, ErrorCode, Timestamp, UserId, WizardId,
};
use crate::domain::progression::{Wizard, WizardCompletion};
use crate::ports::WizardRepository;

/// PostgreSQL implementation of the WizardRepository port.
pub struct PostgresWizardRepository {
    pool: PgPool,
}

impl PostgresWizardRepository {
    /// Creates a new PostgresWizardRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a wizard.
#[derive(Debug, sqlx::FromRow)]
struct WizardRow {
    id: Uuid,
    community_id: Uuid,
    name: String,
    is_active: bool,
}

impl From<WizardRow> for Wizard {
    fn from(row: WizardRow) -> Self {
        Wizard {
            id: WizardId::from_uuid(row.id),
            community_id: CommunityId::from_uuid(row.community_id),
            name: row.name,
            is_active: row.is_active,
        }
    }
}

/// Database row representation of a completion record.
#[derive(Debug, sqlx::FromRow)]
struct CompletionRow {
    user_id: String,
    wizard_id: Uuid,
    completed_at: DateTime<Utc>,
    version: i32,
}

impl TryFrom<CompletionRow> for WizardCompletion {
    type Error = DomainError;

    fn try_from(row: CompletionRow) -> Result<Self, Self::Error> {
        Ok(WizardCompletion {
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            wizard_id: WizardId::from_uuid(row.wizard_id),
            completed_at: Timestamp::from_datetime(row.completed_at),
            version: row.version,
        })
    }
}

#[async_trait]
impl WizardRepository for PostgresWizardRepository {
    async fn find(&self, wizard_id: WizardId) -> Result<Option<Wizard>, DomainError> {
        let row: Option<WizardRow> = sqlx::query_as(
            "SELECT id, community_id, name, is_active FROM wizards WHERE id = $1",
        )
        .bind(wizard_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load wizard: {}", e),
            )
        })?;

        Ok(row.map(Wizard::from))
    }

    async fn record_completion(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
        completed_at: Timestamp,
    ) -> Result<WizardCompletion, DomainError> {
        // Version bump happens inside the upsert so re-completions stay a
        // single atomic statement.
        let row: CompletionRow = sqlx::query_as(
            "INSERT INTO wizard_completions (user_id, wizard_id, completed_at, version) \
             VALUES ($1, $2, $3, 1) \
             ON CONFLICT (user_id, wizard_id) \
             DO UPDATE SET completed_at = EXCLUDED.completed_at, \
                           version = wizard_completions.version + 1 \
             RETURNING user_id, wizard_id, completed_at, version",
        )
        .bind(user_id.as_str())
        .bind(wizard_id.as_uuid())
        .bind(*completed_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record completion: {}", e),
            )
        })?;

        row.try_into()
    }

    async fn find_completion(
        &self,
        user_id: &UserId,
        wizard_id: WizardId,
    ) -> Result<Option<WizardCompletion>, DomainError> {
        let row: Option<CompletionRow> = sqlx::query_as(
            "SELECT user_id, wizard_id, completed_at, version \
             FROM wizard_completions WHERE user_id = $1 AND wizard_id = $2",
        )
        .bind(user_id.as_str())
        .bind(wizard_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load completion: {}", e),
            )
        })?;

        row.map(WizardCompletion::try_from).transpose()
    }
}
