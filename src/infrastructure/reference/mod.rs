//! Reference checker implementations

mod in_memory;
mod postgres;

pub use in_memory::InMemoryReferenceChecker;
pub use postgres::PostgresReferenceChecker;
