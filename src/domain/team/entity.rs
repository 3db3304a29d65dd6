//! Team entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{is_valid_team_name, normalize_tags};
use crate::domain::identity::Identity;
use crate::domain::storage::StorageEntity;
use crate::domain::DomainError;

/// Team name - trimmed, lowercase, checked against the team name grammar
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamName(String);

impl TeamName {
    /// Trim the raw input and validate what is left
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();

        if !is_valid_team_name(name) {
            return Err(DomainError::invalid_team_name(name));
        }

        Ok(Self(name.to_string()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TeamName> for String {
    fn from(name: TeamName) -> Self {
        name.0
    }
}

impl std::fmt::Display for TeamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique name, immutable once stored
    name: TeamName,
    /// Email of the user who created the team
    creating_user: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl Team {
    /// Create a team owned by `creating_user`, normalizing the tags
    pub fn new<S: AsRef<str>>(name: TeamName, creating_user: &dyn Identity, tags: &[S]) -> Self {
        Self {
            name,
            creating_user: creating_user.email().to_string(),
            tags: normalize_tags(tags),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn creating_user(&self) -> &str {
        &self.creating_user
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Replace the tags, normalizing them first
    pub fn set_tags<S: AsRef<str>>(&mut self, tags: &[S]) {
        self.tags = normalize_tags(tags);
    }
}

impl StorageEntity for Team {
    fn key(&self) -> &str {
        self.name.as_str()
    }
}
