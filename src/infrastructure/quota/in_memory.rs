//! In-memory quota storage

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::DomainError;
use crate::domain::quota::{Quota, QuotaStorage};

/// Quota storage backed by a sharded concurrent map
///
/// Each conditional write holds only the shard of the item it touches, so
/// unrelated items never wait on each other.
#[derive(Debug, Default)]
pub struct InMemoryQuotaStorage {
    quotas: DashMap<String, Quota>,
}

impl InMemoryQuotaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with quotas
    pub fn with_quotas<I, S>(quotas: I) -> Self
    where
        I: IntoIterator<Item = (S, Quota)>,
        S: Into<String>,
    {
        Self {
            quotas: quotas
                .into_iter()
                .map(|(name, quota)| (name.into(), quota))
                .collect(),
        }
    }

    fn swap(
        &self,
        name: &str,
        expected: Quota,
        replacement: Quota,
    ) -> Result<bool, DomainError> {
        let mut current = self
            .quotas
            .get_mut(name)
            .ok_or_else(|| DomainError::quota_not_found(name))?;

        if *current != expected {
            return Ok(false);
        }

        *current = replacement;
        Ok(true)
    }
}

#[async_trait]
impl QuotaStorage for InMemoryQuotaStorage {
    async fn insert(&self, name: &str, quota: Quota) -> Result<(), DomainError> {
        match self.quotas.entry(name.to_string()) {
            Entry::Occupied(_) => Err(DomainError::conflict(format!(
                "Quota for '{}' already exists",
                name
            ))),
            Entry::Vacant(entry) => {
                entry.insert(quota);
                Ok(())
            }
        }
    }

    async fn get(&self, name: &str) -> Result<Quota, DomainError> {
        self.quotas
            .get(name)
            .map(|quota| *quota)
            .ok_or_else(|| DomainError::quota_not_found(name))
    }

    async fn set(&self, name: &str, expected: Quota, quantity: i64) -> Result<bool, DomainError> {
        self.swap(name, expected, Quota::new(expected.limit, quantity))
    }

    async fn set_limit(
        &self,
        name: &str,
        expected: Quota,
        limit: i64,
    ) -> Result<bool, DomainError> {
        self.swap(name, expected, Quota::new(limit, expected.in_use))
    }
}
