//! Domain layer - Core business logic and entities

pub mod error;
pub mod identity;
pub mod quota;
pub mod storage;
pub mod team;

pub use error::{DomainError, ErrorKind};
pub use identity::{Identity, User};
pub use quota::{Quota, QuotaItem, QuotaStorage};
pub use storage::{Storage, StorageEntity};
pub use team::{ReferenceChecker, ReferenceKind, Team, TeamName, TeamStorage};
