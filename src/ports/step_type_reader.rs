//! StepTypeReader port - step-type catalog access.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StepTypeId};
use crate::domain::progression::StepTypeEntry;

/// Port for reading the immutable step-type catalog.
///
/// The catalog is seed data; implementations may cache it for the process
/// lifetime. A missing entry is NOT an error - the evaluator fails closed
/// on unresolvable types, so readers return `None` rather than inventing
/// rows.
#[async_trait]
pub trait StepTypeReader: Send + Sync {
    /// Looks up one catalog entry by id.
    async fn find(&self, id: StepTypeId) -> Result<Option<StepTypeEntry>, DomainError>;

    /// Returns the whole catalog.
    async fn all(&self) -> Result<Vec<StepTypeEntry>, DomainError>;
}
