//! Quota domain
//!
//! Bounded usage counters owned by named items (users, applications).

mod entity;
mod repository;

pub use entity::{Quota, QuotaItem};
pub use repository::QuotaStorage;

#[cfg(test)]
pub use repository::MockQuotaStorage;
