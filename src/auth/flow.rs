use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::api::ApiClient;
use crate::error::StorageError;
use crate::routes::Route;
use crate::session::SessionProvider;
use crate::types::{Role, Session, UserRecord};

/// Inline messages shown by the login form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginFailure {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is disabled or suspended")]
    AccountDisabled,
    #[error("Login failed")]
    Failed,
    #[error("Network error")]
    Network,
}

/// Authenticate and persist the session.
///
/// Only a `200` is a success. The token comes from the body's `token` field and the
/// whole body is stored as the user. Nothing is written when the attempt fails.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<Route, LoginFailure> {
    let body = serde_json::json!({ "username": username, "password": password });
    let request = client
        .request(Method::POST, "/api/auth/login")
        .map_err(|e| {
            tracing::warn!("Login request could not be built: {}", e);
            LoginFailure::Network
        })?
        .json(&body);

    let response = request.send().await.map_err(|e| {
        tracing::warn!("Login error: {}", e);
        LoginFailure::Network
    })?;

    match response.status() {
        StatusCode::OK => {}
        StatusCode::UNAUTHORIZED => return Err(LoginFailure::InvalidCredentials),
        StatusCode::FORBIDDEN => return Err(LoginFailure::AccountDisabled),
        other => {
            tracing::debug!("Login rejected with {}", other);
            return Err(LoginFailure::Failed);
        }
    }

    let data: Value = response.json().await.map_err(|e| {
        tracing::warn!("Login response was not JSON: {}", e);
        LoginFailure::Failed
    })?;
    let session = session_from_login(data).ok_or(LoginFailure::Failed)?;

    client.session().set(&session).map_err(|e| {
        tracing::warn!("Failed to persist session: {}", e);
        LoginFailure::Failed
    })?;
    tracing::info!("Signed in as {}", session.user.username);
    Ok(Route::Dashboard)
}

/// Build the stored session from a login body; `None` without a token
fn session_from_login(data: Value) -> Option<Session> {
    let token = data
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())?
        .to_string();

    let Value::Object(mut fields) = data else {
        return None;
    };
    let user = match serde_json::from_value::<UserRecord>(Value::Object(fields.clone())) {
        Ok(user) => user,
        Err(e) => {
            // Odd field types (a numeric role, say) are kept verbatim for the role resolver
            tracing::warn!("Unexpected user shape in login response: {}", e);
            let username = fields
                .remove("username")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            UserRecord { username, extra: fields, ..Default::default() }
        }
    };
    Some(Session { token, user })
}

/// Where the login view goes on open: straight to the dashboard when signed in
pub fn login_view_redirect<P: SessionProvider + ?Sized>(provider: &P) -> Option<Route> {
    provider.is_present().then_some(Route::Dashboard)
}

/// Best-effort server logout, then always clear the local session
pub async fn logout(client: &ApiClient) -> Route {
    if client.session().token().is_some() {
        let result = match client.request(Method::POST, "/api/auth/logout") {
            Ok(request) => request.send().await.map(|_| ()).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = result {
            tracing::warn!("Error during logout API call: {}", e);
        }
    }

    if let Err(e) = client.session().clear() {
        tracing::warn!("Failed to clear session storage: {}", e);
    }
    tracing::info!("Signed out");
    Route::Login
}

/// Replace the session with a synthetic `testuser` holding `role`
pub fn set_test_role<P: SessionProvider + ?Sized>(provider: &P, role: Role) -> Result<(), StorageError> {
    const TEST_TOKEN: &str = "test-token";

    let mut user = UserRecord::new("testuser", role);
    user.extra.insert("token".to_string(), Value::String(TEST_TOKEN.to_string()));
    provider.set(&Session {
        token: TEST_TOKEN.to_string(),
        user,
    })
}
