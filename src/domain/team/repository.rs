//! Team storage port

use async_trait::async_trait;

use super::entity::Team;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Durable storage for teams
///
/// `insert` rejects a name that is already stored with
/// [`DomainError::TeamAlreadyExists`]; `find_by_name`, `update` and `delete`
/// report a missing name with [`DomainError::TeamNotFound`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamStorage: Send + Sync + std::fmt::Debug {
    /// Store a new team
    async fn insert(&self, team: Team) -> Result<(), DomainError>;

    /// Replace a stored team
    async fn update(&self, team: Team) -> Result<(), DomainError>;

    /// Delete a team by name
    async fn delete(&self, name: &str) -> Result<(), DomainError>;

    /// Find a team by name
    async fn find_by_name(&self, name: &str) -> Result<Team, DomainError>;

    /// List all teams
    async fn find_all(&self) -> Result<Vec<Team>, DomainError>;
}
