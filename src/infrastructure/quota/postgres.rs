//! PostgreSQL quota storage

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgPool;

use crate::domain::DomainError;
use crate::domain::quota::{Quota, QuotaStorage};
use crate::infrastructure::storage::is_unique_violation;

/// Quota storage over a `(name, quota_limit, in_use)` table
///
/// Conditional writes are single-row `UPDATE`s guarded on the expected
/// values, so Postgres row locking serializes writers per item.
pub struct PostgresQuotaStorage {
    pool: PgPool,
    table_name: String,
}

impl std::fmt::Debug for PostgresQuotaStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresQuotaStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresQuotaStorage {
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, DomainError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE name = $1) AS exists",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check quota: {}", e)))?;

        Ok(row.get("exists"))
    }

    /// Turn the affected row count of a guarded update into the swap result
    async fn swapped(&self, name: &str, rows_affected: u64) -> Result<bool, DomainError> {
        if rows_affected > 0 {
            return Ok(true);
        }

        if self.exists(name).await? {
            Ok(false)
        } else {
            Err(DomainError::quota_not_found(name))
        }
    }
}

#[async_trait]
impl QuotaStorage for PostgresQuotaStorage {
    async fn insert(&self, name: &str, quota: Quota) -> Result<(), DomainError> {
        let query = format!(
            "INSERT INTO {} (name, quota_limit, in_use) VALUES ($1, $2, $3)",
            self.table_name
        );

        sqlx::query(&query)
            .bind(name)
            .bind(quota.limit)
            .bind(quota.in_use)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::conflict(format!("Quota for '{}' already exists", name))
                } else {
                    DomainError::storage(format!("Failed to insert quota: {}", e))
                }
            })?;

        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Quota, DomainError> {
        let query = format!(
            "SELECT quota_limit, in_use FROM {} WHERE name = $1",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get quota: {}", e)))?
            .ok_or_else(|| DomainError::quota_not_found(name))?;

        Ok(Quota::new(row.get("quota_limit"), row.get("in_use")))
    }

    async fn set(&self, name: &str, expected: Quota, quantity: i64) -> Result<bool, DomainError> {
        let query = format!(
            "UPDATE {} SET in_use = $2 WHERE name = $1 AND quota_limit = $3 AND in_use = $4",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(name)
            .bind(quantity)
            .bind(expected.limit)
            .bind(expected.in_use)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set quota usage: {}", e)))?;

        self.swapped(name, result.rows_affected()).await
    }

    async fn set_limit(
        &self,
        name: &str,
        expected: Quota,
        limit: i64,
    ) -> Result<bool, DomainError> {
        let query = format!(
            "UPDATE {} SET quota_limit = $2 WHERE name = $1 AND quota_limit = $3 AND in_use = $4",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(name)
            .bind(limit)
            .bind(expected.limit)
            .bind(expected.in_use)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set quota limit: {}", e)))?;

        self.swapped(name, result.rows_affected()).await
    }
}
