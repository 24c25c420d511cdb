//! PostgreSQL implementation of StepRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, RoleId, StepId, StepTypeId, WizardId};
use crate::domain::progression::Step;
use crate::ports::StepRepository;

/// PostgreSQL implementation of the StepRepository port.
pub struct PostgresStepRepository {
    pool: PgPool,
}

impl PostgresStepRepository {
    /// Creates a new PostgresStepRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a step.
#[derive(Debug, sqlx::FromRow)]
struct StepRow {
    id: Uuid,
    wizard_id: Uuid,
    step_type_id: Uuid,
    position: i32,
    is_mandatory: bool,
    target_role_id: Option<Uuid>,
    is_active: bool,
}

impl From<StepRow> for Step {
    fn from(row: StepRow) -> Self {
        Step {
            id: StepId::from_uuid(row.id),
            wizard_id: WizardId::from_uuid(row.wizard_id),
            step_type_id: StepTypeId::from_uuid(row.step_type_id),
            position: row.position,
            is_mandatory: row.is_mandatory,
            target_role_id: row.target_role_id.map(RoleId::from_uuid),
            is_active: row.is_active,
        }
    }
}

const STEP_COLUMNS: &str =
    "id, wizard_id, step_type_id, position, is_mandatory, target_role_id, is_active";

#[async_trait]
impl StepRepository for PostgresStepRepository {
    async fn find(
        &self,
        wizard_id: WizardId,
        step_id: StepId,
    ) -> Result<Option<Step>, DomainError> {
        let query = format!("SELECT {STEP_COLUMNS} FROM steps WHERE wizard_id = $1 AND id = $2");
        let row: Option<StepRow> = sqlx::query_as(&query)
            .bind(wizard_id.as_uuid())
            .bind(step_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to load step: {}", e))
            })?;

        Ok(row.map(Step::from))
    }

    async fn list_for_wizard(&self, wizard_id: WizardId) -> Result<Vec<Step>, DomainError> {
        let query = format!(
            "SELECT {STEP_COLUMNS} FROM steps WHERE wizard_id = $1 ORDER BY position ASC"
        );
        let rows: Vec<StepRow> = sqlx::query_as(&query)
            .bind(wizard_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to list steps: {}", e),
                )
            })?;

        Ok(rows.into_iter().map(Step::from).collect())
    }

    async fn reorder(
        &self,
        wizard_id: WizardId,
        ordering: &[(StepId, i32)],
    ) -> Result<(), DomainError> {
        // One transaction for the whole assignment. The unique constraint
        // on (wizard_id, position) is deferrable; deferring it here means
        // intermediate states while the per-row updates run are never
        // checked - only the final assignment is, at commit.
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin reorder transaction: {}", e),
            )
        })?;

        sqlx::query("SET CONSTRAINTS steps_wizard_id_position_key DEFERRED")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to defer position constraint: {}", e),
                )
            })?;

        for (step_id, position) in ordering {
            let result = sqlx::query("UPDATE steps SET position = $1 WHERE wizard_id = $2 AND id = $3")
                .bind(position)
                .bind(wizard_id.as_uuid())
                .bind(step_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to update step position: {}", e),
                    )
                })?;
            if result.rows_affected() == 0 {
                // Rolls back the transaction on drop.
                return Err(DomainError::new(
                    ErrorCode::StepNotFound,
                    format!("Step {} not found under wizard {}", step_id, wizard_id),
                ));
            }
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DuplicateStepPosition,
                format!("Reorder violated position uniqueness: {}", e),
            )
        })
    }
}
