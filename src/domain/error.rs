use thiserror::Error;

use super::team::ReferenceKind;

/// Broad category of a [`DomainError`], for callers that branch on kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Quota,
    Storage,
    Configuration,
    Internal,
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(
        "Invalid team name {name:?}: must be at least 2 characters, start with a lowercase \
         letter and contain only lowercase letters, digits, '.', '-', '_' or '@'"
    )]
    InvalidTeamName { name: String },

    #[error("Invalid value {quantity}, cannot be less than 0")]
    InvalidQuantity { quantity: i64 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Team '{name}' not found")]
    TeamNotFound { name: String },

    #[error("Quota not found for '{item}'")]
    QuotaNotFound { item: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Team '{name}' already exists")]
    TeamAlreadyExists { name: String },

    #[error("{kind}: {}", .names.join(", "))]
    ReferentialIntegrity {
        kind: ReferenceKind,
        names: Vec<String>,
    },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Quota exceeded. Available: {available}, Requested: {requested}.")]
    QuotaExceeded { requested: i64, available: i64 },

    #[error("Not enough reserved items")]
    NotEnoughReserved,

    #[error("New limit is less than the current allocated value")]
    LimitLowerThanAllocated,

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_team_name(name: impl Into<String>) -> Self {
        Self::InvalidTeamName { name: name.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn team_not_found(name: impl Into<String>) -> Self {
        Self::TeamNotFound { name: name.into() }
    }

    pub fn quota_not_found(item: impl Into<String>) -> Self {
        Self::QuotaNotFound { item: item.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn team_already_exists(name: impl Into<String>) -> Self {
        Self::TeamAlreadyExists { name: name.into() }
    }

    pub fn referential_integrity(kind: ReferenceKind, names: Vec<String>) -> Self {
        Self::ReferentialIntegrity { kind, names }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTeamName { .. } | Self::InvalidQuantity { .. } | Self::Validation { .. } => {
                ErrorKind::Validation
            }
            Self::TeamNotFound { .. } | Self::QuotaNotFound { .. } | Self::NotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::TeamAlreadyExists { .. }
            | Self::ReferentialIntegrity { .. }
            | Self::Conflict { .. } => ErrorKind::Conflict,
            Self::QuotaExceeded { .. } | Self::NotEnoughReserved | Self::LimitLowerThanAllocated => {
                ErrorKind::Quota
            }
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}
