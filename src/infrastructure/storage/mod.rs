//! Storage infrastructure - Storage implementations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StorageBackends, StorageFactory, StorageType};
pub use in_memory::InMemoryStorage;
pub use migrations::{PostgresMigrator, run_storage_migrations};
pub(crate) use postgres::is_unique_violation;
pub use postgres::{PostgresConfig, PostgresStorage};
