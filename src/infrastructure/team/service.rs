//! Team service for team management

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::DomainError;
use crate::domain::identity::Identity;
use crate::domain::team::{ReferenceChecker, Team, TeamName, TeamStorage};

/// Team service for managing teams
#[derive(Debug)]
pub struct TeamService {
    storage: Arc<dyn TeamStorage>,
    checkers: Vec<Arc<dyn ReferenceChecker>>,
}

impl TeamService {
    /// Create a new team service with no reference checkers
    pub fn new(storage: Arc<dyn TeamStorage>) -> Self {
        Self {
            storage,
            checkers: Vec::new(),
        }
    }

    /// Register a reference checker consulted by [`remove`](Self::remove)
    ///
    /// Checkers run in registration order and the first one reporting
    /// references stops the removal.
    pub fn with_reference_checker(mut self, checker: Arc<dyn ReferenceChecker>) -> Self {
        self.checkers.push(checker);
        self
    }

    /// Create a new team
    ///
    /// The name is trimmed and validated and the tags normalized before
    /// anything is stored. A duplicate name is reported by the storage.
    pub async fn create<S: AsRef<str> + Sync>(
        &self,
        raw_name: &str,
        raw_tags: &[S],
        creating_user: &dyn Identity,
    ) -> Result<(), DomainError> {
        let name = TeamName::parse(raw_name)?;
        let team = Team::new(name, creating_user, raw_tags);

        info!(name = %team.name(), creating_user = %team.creating_user(), "Creating team");

        self.storage.insert(team).await
    }

    /// Get a team by name
    pub async fn find(&self, name: &str) -> Result<Team, DomainError> {
        self.storage.find_by_name(name).await
    }

    /// Replace the tags of a team
    pub async fn update<S: AsRef<str> + Sync>(
        &self,
        name: &str,
        raw_tags: &[S],
    ) -> Result<(), DomainError> {
        let mut team = self.storage.find_by_name(name).await?;
        team.set_tags(raw_tags);

        info!(name = %name, tags = ?team.tags(), "Updating team");

        self.storage.update(team).await
    }

    /// Delete a team nothing references anymore
    pub async fn remove(&self, name: &str) -> Result<(), DomainError> {
        for checker in &self.checkers {
            let names = checker.referencing(name).await?;

            if !names.is_empty() {
                debug!(name = %name, kind = %checker.kind(), referencing = ?names, "Team still referenced");
                return Err(DomainError::referential_integrity(checker.kind(), names));
            }
        }

        info!(name = %name, "Removing team");

        self.storage.delete(name).await
    }

    /// List all teams
    pub async fn list(&self) -> Result<Vec<Team>, DomainError> {
        self.storage.find_all().await
    }
}
