//! Caller identity as seen by this subsystem

use serde::{Deserialize, Serialize};

use super::quota::QuotaItem;

/// Anything that can be recorded as the creator of a team
pub trait Identity: Send + Sync {
    fn email(&self) -> &str;
}

/// A platform user, identified by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

impl Identity for User {
    fn email(&self) -> &str {
        &self.email
    }
}

/// Users own a quota keyed by their email
impl QuotaItem for User {
    fn quota_name(&self) -> &str {
        &self.email
    }
}
