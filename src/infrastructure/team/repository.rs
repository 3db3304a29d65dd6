//! Storage-backed team repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::DomainError;
use crate::domain::storage::Storage;
use crate::domain::team::{Team, TeamStorage};

/// [`TeamStorage`] on top of a generic [`Storage`] backend
#[derive(Debug)]
pub struct StorageTeamRepository {
    storage: Arc<dyn Storage<Team>>,
}

impl StorageTeamRepository {
    /// Create a new storage-backed repository
    pub fn new(storage: Arc<dyn Storage<Team>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TeamStorage for StorageTeamRepository {
    async fn insert(&self, team: Team) -> Result<(), DomainError> {
        let name = team.name().to_string();

        match self.storage.create(team).await {
            Ok(_) => Ok(()),
            Err(DomainError::Conflict { .. }) => Err(DomainError::team_already_exists(name)),
            Err(e) => Err(e),
        }
    }

    async fn update(&self, team: Team) -> Result<(), DomainError> {
        let name = team.name().to_string();

        match self.storage.update(team).await {
            Ok(_) => Ok(()),
            Err(DomainError::NotFound { .. }) => Err(DomainError::team_not_found(name)),
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), DomainError> {
        if self.storage.delete(name).await? {
            Ok(())
        } else {
            Err(DomainError::team_not_found(name))
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Team, DomainError> {
        self.storage
            .get(name)
            .await?
            .ok_or_else(|| DomainError::team_not_found(name))
    }

    async fn find_all(&self) -> Result<Vec<Team>, DomainError> {
        self.storage.list().await
    }
}
