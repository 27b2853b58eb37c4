/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Account roles known to the dashboard.
///
/// Roles carry no numeric hierarchy: every check is made against an explicit
/// allow-set, never a threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::User];

    /// Parse a stored role value. Unknown or empty values coerce to `Role::User`.
    pub fn parse(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_default()
    }

    /// Strict parse used where an unknown value must be rejected (CLI input, forms).
    pub fn try_parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "MANAGER" => Some(Role::Manager),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::try_parse(s).ok_or_else(|| format!("unknown role '{}' (expected ADMIN, MANAGER or USER)", s))
    }
}

/// The user object persisted next to the bearer token.
///
/// The login endpoint returns a combined token+profile payload and the whole body is
/// stored, so unknown fields are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "crate::api::null_as_default")]
    pub username: String,
    /// Raw role as stored; use `Role::parse` (or the role resolver) to interpret it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role: Some(role.as_str().to_string()),
            ..Default::default()
        }
    }
}

/// Token and user pair identifying the current console user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserRecord,
}
