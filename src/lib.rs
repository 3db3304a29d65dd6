//! Tenant governance
//!
//! Teams and quotas for a multi-tenant platform:
//! - Teams with validated names and normalized tags, removable only once no
//!   application or service instance references them
//! - Quotas whose usage stays within `[0, limit]` under concurrent updates
//! - In-memory and PostgreSQL storage backends

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use tracing::info;

use domain::DomainError;
use infrastructure::{
    quota::QuotaService,
    storage::{StorageBackends, StorageFactory},
    team::TeamService,
};

/// The team and quota services, wired to one storage backend
#[derive(Debug)]
pub struct Governance {
    pub teams: TeamService,
    pub quotas: QuotaService,
    pub backends: StorageBackends,
}

impl Governance {
    /// Wire both services to the given backends
    ///
    /// Removal checks applications before service instances.
    pub fn from_backends(backends: StorageBackends, config: &AppConfig) -> Self {
        let teams = TeamService::new(backends.teams.clone())
            .with_reference_checker(backends.applications.clone())
            .with_reference_checker(backends.service_instances.clone());
        let quotas = QuotaService::new(backends.quotas.clone())
            .with_max_attempts(config.quota.max_attempts);

        Self {
            teams,
            quotas,
            backends,
        }
    }
}

/// Build the services from configuration
pub async fn create_governance(config: &AppConfig) -> Result<Governance, DomainError> {
    let backends = StorageFactory::create(&config.storage).await?;
    info!("Governance services initialized");

    Ok(Governance::from_backends(backends, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::quota::{Quota, QuotaStorage};
    use domain::{ReferenceKind, User};
    use infrastructure::reference::InMemoryReferenceChecker;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_governance_in_memory() {
        let governance = create_governance(&AppConfig::default()).await.unwrap();

        governance
            .teams
            .create("atreides", &["house"], &User::new("paul@arrakis.com"))
            .await
            .unwrap();

        let teams = governance.teams.list().await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name(), "atreides");
    }

    #[tokio::test]
    async fn test_checks_apps_before_service_instances() {
        let mut backends = StorageFactory::create_in_memory();
        backends.applications = Arc::new(
            InMemoryReferenceChecker::new(ReferenceKind::Applications)
                .with_entity("leto", vec!["atreides"]),
        );
        backends.service_instances = Arc::new(
            InMemoryReferenceChecker::new(ReferenceKind::ServiceInstances)
                .with_entity("thufir", vec!["atreides"]),
        );
        let governance = Governance::from_backends(backends, &AppConfig::default());

        governance
            .teams
            .create("atreides", &[] as &[&str], &User::new("paul@arrakis.com"))
            .await
            .unwrap();

        let err = governance.teams.remove("atreides").await.unwrap_err();
        assert_eq!(err.to_string(), "Apps: leto");
    }

    #[tokio::test]
    async fn test_quota_for_user() {
        let governance = create_governance(&AppConfig::default()).await.unwrap();
        let user = User::new("paul@arrakis.com");

        governance
            .backends
            .quotas
            .insert("paul@arrakis.com", Quota::new(2, 0))
            .await
            .unwrap();

        governance.quotas.inc(&user, 2).await.unwrap();
        assert!(governance.quotas.inc(&user, 1).await.is_err());
        assert_eq!(governance.quotas.get(&user).await.unwrap(), Quota::new(2, 2));
    }
}
