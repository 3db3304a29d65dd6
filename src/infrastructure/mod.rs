//! Infrastructure layer - Services and storage adapters

pub mod logging;
pub mod quota;
pub mod reference;
pub mod storage;
pub mod team;
