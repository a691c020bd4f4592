use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire value the backend uses for fleet managers ("chef de parc").
pub const FLEET_MANAGER_ROLE: &str = "chef_parc";

/// Wire value the backend uses for dispatchers ("régulateur").
pub const DISPATCHER_ROLE: &str = "regulateur";

/// Operator role attached to a user record.
///
/// Roles arrive as free-form strings. The two known values (and their English
/// aliases) map to dedicated variants when they match exactly; anything else,
/// including other casings, is kept verbatim in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    FleetManager,
    Dispatcher,
    Unrecognized(String),
}

impl Role {
    /// Parse a role string. Matching is exact: no trimming, no case folding.
    pub fn parse(s: &str) -> Self {
        match s {
            FLEET_MANAGER_ROLE | "fleet_manager" => Role::FleetManager,
            DISPATCHER_ROLE | "dispatcher" => Role::Dispatcher,
            _ => Role::Unrecognized(s.to_string()),
        }
    }

    /// Canonical wire value
    pub fn as_str(&self) -> &str {
        match self {
            Role::FleetManager => FLEET_MANAGER_ROLE,
            Role::Dispatcher => DISPATCHER_ROLE,
            Role::Unrecognized(raw) => raw,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Role::FleetManager => "Fleet Manager",
            Role::Dispatcher => "Dispatcher",
            Role::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Unrecognized(_))
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::parse(&s)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::parse(s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
