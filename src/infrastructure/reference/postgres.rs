//! PostgreSQL reference checker

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::domain::DomainError;
use crate::domain::team::{ReferenceChecker, ReferenceKind};

/// Reads a table owned by another subsystem with `name TEXT` and
/// `teams TEXT[]` columns
pub struct PostgresReferenceChecker {
    pool: PgPool,
    table_name: String,
    kind: ReferenceKind,
}

impl std::fmt::Debug for PostgresReferenceChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresReferenceChecker")
            .field("table_name", &self.table_name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PostgresReferenceChecker {
    pub fn new(pool: PgPool, kind: ReferenceKind, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
            kind,
        }
    }
}

#[async_trait]
impl ReferenceChecker for PostgresReferenceChecker {
    fn kind(&self) -> ReferenceKind {
        self.kind
    }

    async fn referencing(&self, team_name: &str) -> Result<Vec<String>, DomainError> {
        let query = format!(
            "SELECT name FROM {} WHERE $1 = ANY(teams) ORDER BY name",
            self.table_name
        );

        sqlx::query_scalar(&query)
            .bind(team_name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to look up {} referencing team '{}': {}",
                    self.kind, team_name, e
                ))
            })
    }
}
