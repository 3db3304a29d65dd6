//! Quota storage port

use async_trait::async_trait;

use super::entity::Quota;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Durable `(limit, in_use)` pairs keyed by item name
///
/// Writes are conditional: `set` and `set_limit` only apply when the stored
/// quota still equals `expected`, and return `Ok(false)` otherwise. This is the
/// compare-and-swap the quota service retries on. A missing item is reported
/// as [`DomainError::QuotaNotFound`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuotaStorage: Send + Sync + std::fmt::Debug {
    /// Register the quota of a new item
    async fn insert(&self, name: &str, quota: Quota) -> Result<(), DomainError>;

    /// Read the current quota of an item
    async fn get(&self, name: &str) -> Result<Quota, DomainError>;

    /// Overwrite `in_use` if the stored quota still equals `expected`
    async fn set(&self, name: &str, expected: Quota, quantity: i64) -> Result<bool, DomainError>;

    /// Overwrite `limit` if the stored quota still equals `expected`
    async fn set_limit(&self, name: &str, expected: Quota, limit: i64)
    -> Result<bool, DomainError>;
}
