use serde::Serialize;
use serde_json::Value;

use crate::session::SessionProvider;
use crate::types::Role;

/// Identity summary shown in the header and on the access-denied page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub role: Role,
    pub id: Option<i64>,
    pub email: Option<String>,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            username: "User".to_string(),
            role: Role::User,
            id: None,
            email: None,
        }
    }
}

/// Role of the current session user.
///
/// Never fails: a missing entry, unparseable JSON, a missing or empty `role` field,
/// or an unrecognized role all resolve to `Role::User`.
pub fn resolve_role<P: SessionProvider + ?Sized>(provider: &P) -> Role {
    stored_user(provider)
        .map(|user| role_of(&user))
        .unwrap_or_default()
}

/// Username, role, id and email of the current session user, with display defaults
pub fn user_info<P: SessionProvider + ?Sized>(provider: &P) -> UserInfo {
    let Some(user) = stored_user(provider) else {
        return UserInfo::default();
    };

    let username = user
        .get("username")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("User")
        .to_string();

    UserInfo {
        username,
        role: role_of(&user),
        id: user.get("id").and_then(Value::as_i64),
        email: user.get("email").and_then(Value::as_str).map(str::to_string),
    }
}

fn stored_user<P: SessionProvider + ?Sized>(provider: &P) -> Option<Value> {
    let raw = provider.user_raw()?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => {
            tracing::warn!("Stored user data is not an object");
            None
        }
        Err(e) => {
            tracing::warn!("Error parsing user data: {}", e);
            None
        }
    }
}

fn role_of(user: &Value) -> Role {
    match user.get("role").and_then(Value::as_str) {
        None => Role::User,
        Some(raw) if raw.trim().is_empty() => Role::User,
        Some(raw) => Role::try_parse(raw).unwrap_or_else(|| {
            tracing::warn!("Unrecognized role '{}' in session, treating as USER", raw);
            Role::User
        }),
    }
}
