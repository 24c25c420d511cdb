//! PostgreSQL implementation of StepTypeReader.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, StepTypeId};
use crate::domain::progression::StepTypeEntry;
use crate::ports::StepTypeReader;

/// PostgreSQL implementation of the StepTypeReader port.
///
/// The catalog is a handful of seeded rows; no caching is done here because
/// the queries are trivially cheap and the rows never change at runtime.
pub struct PostgresStepTypeReader {
    pool: PgPool,
}

impl PostgresStepTypeReader {
    /// Creates a new PostgresStepTypeReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a step-type catalog entry.
#[derive(Debug, sqlx::FromRow)]
struct StepTypeRow {
    id: Uuid,
    name: String,
    requires_credentials: bool,
}

impl From<StepTypeRow> for StepTypeEntry {
    fn from(row: StepTypeRow) -> Self {
        StepTypeEntry {
            id: StepTypeId::from_uuid(row.id),
            name: row.name,
            requires_credentials: row.requires_credentials,
        }
    }
}

#[async_trait]
impl StepTypeReader for PostgresStepTypeReader {
    async fn find(&self, id: StepTypeId) -> Result<Option<StepTypeEntry>, DomainError> {
        let row: Option<StepTypeRow> = sqlx::query_as(
            "SELECT id, name, requires_credentials FROM step_types WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load step type: {}", e),
            )
        })?;

        Ok(row.map(StepTypeEntry::from))
    }

    async fn all(&self) -> Result<Vec<StepTypeEntry>, DomainError> {
        let rows: Vec<StepTypeRow> = sqlx::query_as(
            "SELECT id, name, requires_credentials FROM step_types ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load step-type catalog: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(StepTypeEntry::from).collect())
    }
}
