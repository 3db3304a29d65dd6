//! Team domain module
//!
//! Teams are named ownership groups. Other subsystems (applications, service
//! instances) point at teams by name, so a team can only be removed once
//! nothing references it.

mod entity;
mod reference;
mod repository;
mod validation;

pub use entity::{Team, TeamName};
pub use reference::{ReferenceChecker, ReferenceKind};
pub use repository::TeamStorage;
pub use validation::{is_valid_team_name, normalize_tags};

#[cfg(test)]
pub use reference::MockReferenceChecker;
#[cfg(test)]
pub use repository::MockTeamStorage;
