use serde::Serialize;

use crate::types::Role;

/// Outcome of a role check against an allow-set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum AccessDecision {
    Allowed,
    Denied { reason: String },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// Single authorization decision used by both the menu and page entry.
///
/// An empty allow-set means unrestricted. This only mirrors server policy for
/// display purposes; the backend remains the authority on every request.
pub fn authorize(role: Role, allowed: &[Role]) -> AccessDecision {
    if allowed.is_empty() || allowed.contains(&role) {
        return AccessDecision::Allowed;
    }

    let required = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(" or ");

    AccessDecision::Denied {
        reason: format!("Role {} is not permitted here; requires {}", role, required),
    }
}
