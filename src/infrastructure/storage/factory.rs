//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::postgres::PgPool;
use tracing::info;

use crate::config::StorageSettings;
use crate::domain::DomainError;
use crate::domain::quota::QuotaStorage;
use crate::domain::team::{ReferenceChecker, ReferenceKind, Team, TeamStorage};
use crate::infrastructure::quota::{InMemoryQuotaStorage, PostgresQuotaStorage};
use crate::infrastructure::reference::{InMemoryReferenceChecker, PostgresReferenceChecker};
use crate::infrastructure::team::StorageTeamRepository;

use super::in_memory::InMemoryStorage;
use super::migrations::{QUOTAS_TABLE, TEAMS_TABLE};
use super::postgres::PostgresStorage;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Every port the governance services need, wired to one backend
#[derive(Debug, Clone)]
pub struct StorageBackends {
    pub teams: Arc<dyn TeamStorage>,
    pub quotas: Arc<dyn QuotaStorage>,
    pub applications: Arc<dyn ReferenceChecker>,
    pub service_instances: Arc<dyn ReferenceChecker>,
    /// Connection pool, present for the PostgreSQL backend
    pub pool: Option<PgPool>,
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Builds the backends selected by the settings
    pub async fn create(settings: &StorageSettings) -> Result<StorageBackends, DomainError> {
        let storage_type = StorageType::from_str(&settings.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown storage backend '{}'", settings.backend))
        })?;

        info!("Storage backend: {:?}", storage_type);

        match storage_type {
            StorageType::InMemory => Ok(Self::create_in_memory()),
            StorageType::Postgres => {
                info!("Connecting to PostgreSQL...");
                let pool = settings.postgres.connect().await?;
                info!("PostgreSQL connection established");

                Ok(Self::create_postgres_with_pool(pool, settings))
            }
        }
    }

    /// In-memory backends, with empty reference registries
    pub fn create_in_memory() -> StorageBackends {
        let teams = StorageTeamRepository::new(Arc::new(InMemoryStorage::<Team>::new()));

        StorageBackends {
            teams: Arc::new(teams),
            quotas: Arc::new(InMemoryQuotaStorage::new()),
            applications: Arc::new(InMemoryReferenceChecker::new(ReferenceKind::Applications)),
            service_instances: Arc::new(InMemoryReferenceChecker::new(
                ReferenceKind::ServiceInstances,
            )),
            pool: None,
        }
    }

    /// PostgreSQL backends sharing one pool
    pub fn create_postgres_with_pool(pool: PgPool, settings: &StorageSettings) -> StorageBackends {
        let teams =
            StorageTeamRepository::new(Arc::new(PostgresStorage::<Team>::new(pool.clone(), TEAMS_TABLE)));

        StorageBackends {
            teams: Arc::new(teams),
            quotas: Arc::new(PostgresQuotaStorage::new(pool.clone(), QUOTAS_TABLE)),
            applications: Arc::new(PostgresReferenceChecker::new(
                pool.clone(),
                ReferenceKind::Applications,
                &settings.apps_table,
            )),
            service_instances: Arc::new(PostgresReferenceChecker::new(
                pool.clone(),
                ReferenceKind::ServiceInstances,
                &settings.service_instances_table,
            )),
            pool: Some(pool),
        }
    }
}
