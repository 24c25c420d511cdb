//! In-memory step-type catalog for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, StepTypeId};
use crate::domain::progression::StepTypeEntry;
use crate::ports::StepTypeReader;

/// In-memory implementation of the StepTypeReader port.
pub struct InMemoryStepTypeReader {
    entries: RwLock<HashMap<StepTypeId, StepTypeEntry>>,
}

impl InMemoryStepTypeReader {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a catalog seeded with the standard step types.
    pub async fn with_standard_catalog() -> Self {
        let reader = Self::new();
        for name in [
            "credential_check",
            "quizmaster_basic",
            "quizmaster_ai",
            "content",
            "sidequest",
        ] {
            reader
                .insert(StepTypeEntry {
                    id: StepTypeId::new(),
                    name: name.to_string(),
                    requires_credentials: name == "credential_check",
                })
                .await;
        }
        reader
    }

    /// Inserts a catalog entry (test seeding).
    pub async fn insert(&self, entry: StepTypeEntry) {
        self.entries.write().await.insert(entry.id, entry);
    }
}

impl Default for InMemoryStepTypeReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepTypeReader for InMemoryStepTypeReader {
    async fn find(&self, id: StepTypeId) -> Result<Option<StepTypeEntry>, DomainError> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<StepTypeEntry>, DomainError> {
        Ok(self.entries.read().await.values().cloned().collect())
    }
}
