//! Entities outside this subsystem that may still point at a team

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Category of entity that can reference a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Applications,
    ServiceInstances,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applications => write!(f, "Apps"),
            Self::ServiceInstances => write!(f, "Service instances"),
        }
    }
}

/// Reports which entities of one kind reference a team
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReferenceChecker: Send + Sync + std::fmt::Debug {
    /// The kind of entity this checker looks at
    fn kind(&self) -> ReferenceKind;

    /// Names of the entities referencing `team_name`, empty when there are none
    async fn referencing(&self, team_name: &str) -> Result<Vec<String>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ReferenceKind::Applications.to_string(), "Apps");
        assert_eq!(
            ReferenceKind::ServiceInstances.to_string(),
            "Service instances"
        );
    }
}
