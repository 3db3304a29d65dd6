//! Quota value type

use serde::{Deserialize, Serialize};

/// Usage counter with a ceiling
///
/// A limit of [`Quota::UNLIMITED`] means there is no ceiling. `in_use` never
/// goes below zero, and never above `limit` while the quota is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub limit: i64,
    #[serde(rename = "inuse")]
    pub in_use: i64,
}

impl Quota {
    /// Sentinel limit for quotas with no ceiling
    pub const UNLIMITED: i64 = -1;

    pub fn new(limit: i64, in_use: i64) -> Self {
        Self { limit, in_use }
    }

    /// The template new unbounded quotas start from
    pub fn unlimited() -> Self {
        Self::new(Self::UNLIMITED, 0)
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit == Self::UNLIMITED
    }

    /// Remaining headroom, `None` when unbounded
    pub fn available(&self) -> Option<i64> {
        if self.is_unlimited() {
            None
        } else {
            Some(self.limit - self.in_use)
        }
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Anything that owns a quota, keyed by a stable name
pub trait QuotaItem: Send + Sync {
    fn quota_name(&self) -> &str;
}

impl QuotaItem for str {
    fn quota_name(&self) -> &str {
        self
    }
}

impl QuotaItem for String {
    fn quota_name(&self) -> &str {
        self
    }
}
