//! Quota infrastructure implementations

mod in_memory;
mod postgres;
mod service;

pub use in_memory::InMemoryQuotaStorage;
pub use postgres::PostgresQuotaStorage;
pub use service::{DEFAULT_MAX_ATTEMPTS, QuotaService};
