//! Quota service: invariant-preserving usage accounting

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::domain::quota::{Quota, QuotaItem, QuotaStorage};

/// How many times a mutation re-reads and retries after losing a race
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Write a mutation wants to make, planned from a fresh read
enum PlannedWrite {
    InUse(i64),
    Limit(i64),
}

/// Quota service keeping `0 <= in_use <= limit` for bounded quotas
///
/// Every mutation reads the current quota, validates against it and writes
/// conditionally on that read. A lost race re-reads and re-validates, so
/// concurrent calls on one item behave as some serial order of those calls.
#[derive(Debug)]
pub struct QuotaService {
    storage: Arc<dyn QuotaStorage>,
    max_attempts: usize,
}

impl QuotaService {
    /// Create a new quota service
    pub fn new(storage: Arc<dyn QuotaStorage>) -> Self {
        Self {
            storage,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Bound the number of conditional-write attempts per call
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Read the current quota of an item
    pub async fn get<I: QuotaItem + ?Sized>(&self, item: &I) -> Result<Quota, DomainError> {
        self.storage.get(item.quota_name()).await
    }

    /// Reserve (positive `delta`) or release (negative `delta`) units
    pub async fn inc<I: QuotaItem + ?Sized>(&self, item: &I, delta: i64) -> Result<(), DomainError> {
        let name = item.quota_name();
        debug!(item = %name, delta, "Changing quota usage");

        self.apply(name, |quota| {
            let in_use = quota
                .in_use
                .checked_add(delta)
                .ok_or_else(|| DomainError::validation(format!("Quota delta {} overflows", delta)))?;

            if in_use < 0 {
                return Err(DomainError::NotEnoughReserved);
            }

            if !quota.is_unlimited() && in_use > quota.limit {
                return Err(DomainError::QuotaExceeded {
                    requested: delta,
                    available: quota.limit - quota.in_use,
                });
            }

            Ok(PlannedWrite::InUse(in_use))
        })
        .await
    }

    /// Overwrite the usage of an item
    pub async fn set<I: QuotaItem + ?Sized>(
        &self,
        item: &I,
        quantity: i64,
    ) -> Result<(), DomainError> {
        if quantity < 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }

        let name = item.quota_name();
        debug!(item = %name, quantity, "Setting quota usage");

        self.apply(name, |quota| {
            if !quota.is_unlimited() && quantity > quota.limit {
                return Err(DomainError::QuotaExceeded {
                    requested: quantity,
                    available: quota.limit,
                });
            }

            Ok(PlannedWrite::InUse(quantity))
        })
        .await
    }

    /// Change the ceiling of an item; any negative limit means unbounded
    pub async fn set_limit<I: QuotaItem + ?Sized>(
        &self,
        item: &I,
        limit: i64,
    ) -> Result<(), DomainError> {
        let limit = if limit < 0 { Quota::UNLIMITED } else { limit };
        let name = item.quota_name();
        info!(item = %name, limit, "Setting quota limit");

        self.apply(name, |quota| {
            if limit != Quota::UNLIMITED && limit < quota.in_use {
                return Err(DomainError::LimitLowerThanAllocated);
            }

            Ok(PlannedWrite::Limit(limit))
        })
        .await
    }

    async fn apply<F>(&self, name: &str, mut plan: F) -> Result<(), DomainError>
    where
        F: FnMut(Quota) -> Result<PlannedWrite, DomainError>,
    {
        for attempt in 1..=self.max_attempts {
            let current = self.storage.get(name).await?;

            let written = match plan(current)? {
                PlannedWrite::InUse(quantity) => self.storage.set(name, current, quantity).await?,
                PlannedWrite::Limit(limit) => self.storage.set_limit(name, current, limit).await?,
            };

            if written {
                return Ok(());
            }

            debug!(item = %name, attempt, "Quota changed concurrently, retrying");
            tokio::task::yield_now().await;
        }

        warn!(item = %name, attempts = self.max_attempts, "Giving up on contended quota");

        Err(DomainError::conflict(format!(
            "Quota for '{}' kept changing concurrently, retry the operation",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::User;
    use crate::domain::quota::MockQuotaStorage;
    use crate::infrastructure::quota::InMemoryQuotaStorage;

    fn service_with(name: &str, quota: Quota) -> (QuotaService, Arc<InMemoryQuotaStorage>) {
        let storage = Arc::new(InMemoryQuotaStorage::with_quotas([(name, quota)]));
        (QuotaService::new(storage.clone()), storage)
    }

    #[tokio::test]
    async fn test_get() {
        let (service, _) = service_with("leto", Quota::new(3, 1));

        let quota = service.get("leto").await.unwrap();
        assert_eq!(quota, Quota::new(3, 1));
    }

    #[tokio::test]
    async fn test_get_by_user() {
        let (service, _) = service_with("king@pos.com", Quota::new(3, 2));

        let quota = service.get(&User::new("king@pos.com")).await.unwrap();
        assert_eq!(quota.in_use, 2);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let (service, _) = service_with("leto", Quota::unlimited());

        let err = service.get("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::QuotaNotFound { .. }));
    }

    #[tokio::test]
    async fn test_inc() {
        let (service, storage) = service_with("leto", Quota::new(5, 1));

        service.inc("leto", 3).await.unwrap();

        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 4));
    }

    #[tokio::test]
    async fn test_inc_release() {
        let (service, storage) = service_with("leto", Quota::new(5, 4));

        service.inc("leto", -4).await.unwrap();

        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 0));
    }

    #[tokio::test]
    async fn test_inc_exceeded() {
        let (service, storage) = service_with("leto", Quota::new(5, 4));

        let err = service.inc("leto", 2).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::QuotaExceeded {
                requested: 2,
                available: 1
            }
        ));
        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 4));
    }

    #[tokio::test]
    async fn test_inc_not_enough_reserved() {
        let (service, storage) = service_with("leto", Quota::new(5, 1));

        let err = service.inc("leto", -2).await.unwrap_err();

        assert!(matches!(err, DomainError::NotEnoughReserved));
        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 1));
    }

    #[tokio::test]
    async fn test_inc_unlimited() {
        let (service, storage) = service_with("leto", Quota::unlimited());

        service.inc("leto", 1_000_000).await.unwrap();

        assert_eq!(storage.get("leto").await.unwrap().in_use, 1_000_000);
    }

    #[tokio::test]
    async fn test_inc_unlimited_still_floors_at_zero() {
        let (service, _) = service_with("leto", Quota::unlimited());

        let err = service.inc("leto", -1).await.unwrap_err();
        assert!(matches!(err, DomainError::NotEnoughReserved));
    }

    #[tokio::test]
    async fn test_inc_missing_item() {
        let (service, _) = service_with("leto", Quota::unlimited());

        let err = service.inc("ghost", 1).await.unwrap_err();
        assert!(matches!(err, DomainError::QuotaNotFound { .. }));
    }

    #[tokio::test]
    async fn test_inc_sequence_keeps_bounds() {
        let limit = 7;
        let (service, storage) = service_with("leto", Quota::new(limit, 0));
        let deltas = [3, 5, -1, 4, -6, -3, 2, 9, -2, 1, 1, 1, -8, 0, 7, -7];

        for delta in deltas {
            let before = storage.get("leto").await.unwrap();
            let result = service.inc("leto", delta).await;
            let after = storage.get("leto").await.unwrap();

            assert!(after.in_use >= 0 && after.in_use <= limit);

            let target = before.in_use + delta;
            if (0..=limit).contains(&target) {
                assert!(result.is_ok());
                assert_eq!(after.in_use, target);
            } else {
                assert!(result.is_err());
                assert_eq!(after, before);
            }
        }
    }

    #[tokio::test]
    async fn test_set() {
        let (service, storage) = service_with("leto", Quota::new(5, 4));

        service.set("leto", 2).await.unwrap();

        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 2));
    }

    #[tokio::test]
    async fn test_set_negative() {
        let (service, storage) = service_with("leto", Quota::new(5, 4));

        let err = service.set("leto", -1).await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidQuantity { quantity: -1 }));
        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 4));
    }

    #[tokio::test]
    async fn test_set_negative_does_not_touch_storage() {
        let storage = MockQuotaStorage::new();
        let service = QuotaService::new(Arc::new(storage));

        let err = service.set("leto", -5).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity { .. }));
    }

    #[tokio::test]
    async fn test_set_exceeded() {
        let (service, storage) = service_with("leto", Quota::new(5, 1));

        let err = service.set("leto", 6).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::QuotaExceeded {
                requested: 6,
                available: 5
            }
        ));
        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 1));
    }

    #[tokio::test]
    async fn test_set_unlimited() {
        let (service, storage) = service_with("leto", Quota::unlimited());

        service.set("leto", 500).await.unwrap();

        assert_eq!(storage.get("leto").await.unwrap().in_use, 500);
    }

    #[tokio::test]
    async fn test_set_limit() {
        let (service, storage) = service_with("leto", Quota::new(5, 3));

        service.set_limit("leto", 3).await.unwrap();

        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(3, 3));
    }

    #[tokio::test]
    async fn test_set_limit_lower_than_allocated() {
        let (service, storage) = service_with("leto", Quota::new(5, 3));

        let err = service.set_limit("leto", 2).await.unwrap_err();

        assert!(matches!(err, DomainError::LimitLowerThanAllocated));
        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(5, 3));
    }

    #[tokio::test]
    async fn test_set_limit_unlimited_lifts_bounds() {
        let (service, storage) = service_with("leto", Quota::new(2, 2));

        service.set_limit("leto", Quota::UNLIMITED).await.unwrap();
        service.inc("leto", 10).await.unwrap();
        service.set("leto", 100).await.unwrap();

        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(-1, 100));
    }

    #[tokio::test]
    async fn test_set_limit_negative_means_unlimited() {
        let (service, storage) = service_with("leto", Quota::new(2, 1));

        service.set_limit("leto", -20).await.unwrap();

        assert!(storage.get("leto").await.unwrap().is_unlimited());
    }

    #[tokio::test]
    async fn test_retries_after_lost_race() {
        let reads = Arc::new(AtomicUsize::new(0));
        let writes = Arc::new(AtomicUsize::new(0));
        let mut storage = MockQuotaStorage::new();

        let reads_in = reads.clone();
        storage.expect_get().times(2).returning(move |_| {
            // Another writer bumps usage between our first read and write
            match reads_in.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(Quota::new(5, 1)),
                _ => Ok(Quota::new(5, 4)),
            }
        });

        let writes_in = writes.clone();
        storage
            .expect_set()
            .times(2)
            .returning(move |_, expected, quantity| {
                let first = writes_in.fetch_add(1, Ordering::SeqCst) == 0;
                if first {
                    assert_eq!((expected, quantity), (Quota::new(5, 1), 2));
                    Ok(false)
                } else {
                    assert_eq!((expected, quantity), (Quota::new(5, 4), 5));
                    Ok(true)
                }
            });

        let service = QuotaService::new(Arc::new(storage));
        service.inc("leto", 1).await.unwrap();

        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_revalidates_after_lost_race() {
        let reads = Arc::new(AtomicUsize::new(0));
        let mut storage = MockQuotaStorage::new();

        let reads_in = reads.clone();
        storage.expect_get().times(2).returning(move |_| {
            match reads_in.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(Quota::new(5, 0)),
                _ => Ok(Quota::new(2, 0)),
            }
        });
        storage.expect_set().times(1).returning(|_, _, _| Ok(false));

        let service = QuotaService::new(Arc::new(storage));
        let err = service.set("leto", 4).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::QuotaExceeded {
                requested: 4,
                available: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mut storage = MockQuotaStorage::new();
        storage
            .expect_get()
            .times(3)
            .returning(|_| Ok(Quota::new(5, 0)));
        storage.expect_set_limit().times(3).returning(|_, _, _| Ok(false));

        let service = QuotaService::new(Arc::new(storage)).with_max_attempts(3);
        let err = service.set_limit("leto", 4).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_storage_error_passes_through() {
        let mut storage = MockQuotaStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(DomainError::storage("connection reset")));

        let service = QuotaService::new(Arc::new(storage));
        let err = service.inc("leto", 1).await.unwrap_err();

        assert!(matches!(err, DomainError::Storage { ref message } if message == "connection reset"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inc_loses_no_update() {
        let (service, storage) = service_with("leto", Quota::new(2, 0));
        let service = Arc::new(service);

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.inc("leto", 1).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.inc("leto", 1).await }
        });

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(2, 2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inc_never_overshoots() {
        let (service, storage) = service_with("leto", Quota::new(20, 0));
        let service = Arc::new(service);

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.inc("leto", 1).await })
            })
            .collect();

        let results = futures::future::join_all(handles).await;
        let succeeded = results
            .into_iter()
            .map(|joined| joined.unwrap())
            .filter(|result| match result {
                Ok(()) => true,
                Err(DomainError::QuotaExceeded { .. }) => false,
                Err(other) => panic!("unexpected error: {}", other),
            })
            .count();

        assert_eq!(succeeded, 20);
        assert_eq!(storage.get("leto").await.unwrap(), Quota::new(20, 20));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_items_are_independent() {
        let storage = Arc::new(InMemoryQuotaStorage::with_quotas([
            ("leto", Quota::new(10, 0)),
            ("paul", Quota::new(10, 0)),
        ]));
        let service = Arc::new(QuotaService::new(storage.clone()));

        let handles: Vec<_> = ["leto", "paul"]
            .into_iter()
            .cycle()
            .take(20)
            .map(|name| {
                let service = service.clone();
                tokio::spawn(async move { service.inc(name, 1).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(storage.get("leto").await.unwrap().in_use, 10);
        assert_eq!(storage.get("paul").await.unwrap().in_use, 10);
    }
}
