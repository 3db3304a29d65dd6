//! In-memory reference checker

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::team::{ReferenceChecker, ReferenceKind};

/// Reference checker over an in-process registry of `entity -> teams`
#[derive(Debug)]
pub struct InMemoryReferenceChecker {
    kind: ReferenceKind,
    entities: RwLock<BTreeMap<String, Vec<String>>>,
}

impl InMemoryReferenceChecker {
    pub fn new(kind: ReferenceKind) -> Self {
        Self {
            kind,
            entities: RwLock::new(BTreeMap::new()),
        }
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_entity<S: Into<String>>(self, name: impl Into<String>, teams: Vec<S>) -> Self {
        self.register(name, teams);
        self
    }

    /// Record that `name` belongs to `teams`, replacing any earlier entry
    pub fn register<S: Into<String>>(&self, name: impl Into<String>, teams: Vec<S>) {
        let teams = teams.into_iter().map(Into::into).collect();
        self.entities
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.into(), teams);
    }

    /// Forget an entity
    pub fn unregister(&self, name: &str) {
        self.entities
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name);
    }
}

#[async_trait]
impl ReferenceChecker for InMemoryReferenceChecker {
    fn kind(&self) -> ReferenceKind {
        self.kind
    }

    async fn referencing(&self, team_name: &str) -> Result<Vec<String>, DomainError> {
        let entities = self
            .entities
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entities
            .iter()
            .filter(|(_, teams)| teams.iter().any(|team| team == team_name))
            .map(|(name, _)| name.clone())
            .collect())
    }
}
