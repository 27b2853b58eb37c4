mod common;

use std::sync::Arc;

use admin_dashboard::auth::flow::{login, logout};
use admin_dashboard::auth::{resolve_role, LoginFailure};
use admin_dashboard::session::{SessionEvent, StorageSessionProvider};
use admin_dashboard::{ApiClient, Role, Route, SessionProvider};
use anyhow::Result;

#[tokio::test]
async fn successful_login_persists_whole_body() -> Result<()> {
    let server = common::spawn_backend().await?;
    let (client, provider) = server.client()?;
    let mut events = provider.subscribe();

    let route = login(&client, "mia", "secret").await;
    assert_eq!(route, Ok(Route::Dashboard));

    let session = provider.get().expect("session stored");
    assert_eq!(session.token, "tok-mia");
    assert_eq!(session.user.username, "mia");
    assert_eq!(session.user.extra["healthCenterId"], 4);
    assert_eq!(session.user.extra["token"], "tok-mia");
    assert_eq!(resolve_role(provider.as_ref()), Role::Manager);
    assert_eq!(events.try_recv()?, SessionEvent::Updated);
    Ok(())
}

#[tokio::test]
async fn rejected_login_writes_nothing() -> Result<()> {
    let server = common::spawn_backend().await?;
    let (client, provider) = server.client()?;

    assert_eq!(login(&client, "mia", "wrong").await, Err(LoginFailure::InvalidCredentials));
    assert_eq!(login(&client, "suspended", "secret").await, Err(LoginFailure::AccountDisabled));
    assert_eq!(login(&client, "teapot", "secret").await, Err(LoginFailure::Failed));

    assert!(provider.token().is_none());
    assert!(provider.user_raw().is_none());
    assert_eq!(server.state.requests_to("/api/auth/login").len(), 3);
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> Result<()> {
    let provider = Arc::new(StorageSessionProvider::in_memory());
    let client = ApiClient::new(&common::unreachable_base_url()?, provider.clone())?;

    let result = login(&client, "mia", "secret").await;
    assert_eq!(result, Err(LoginFailure::Network));
    assert_eq!(result.unwrap_err().to_string(), "Network error");
    assert!(!provider.is_present());
    Ok(())
}

#[tokio::test]
async fn logout_sends_bearer_and_clears() -> Result<()> {
    let server = common::spawn_backend().await?;
    let (client, provider) = server.client()?;
    login(&client, "root", "secret").await.expect("login");
    let mut events = provider.subscribe();

    assert_eq!(logout(&client).await, Route::Login);

    let calls = server.state.requests_to("/api/auth/logout");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer tok-root"));
    assert!(!provider.is_present());
    assert_eq!(events.try_recv()?, SessionEvent::Cleared);
    Ok(())
}

#[tokio::test]
async fn logout_clears_even_when_server_is_down() -> Result<()> {
    let provider = Arc::new(StorageSessionProvider::in_memory());
    admin_dashboard::auth::flow::set_test_role(provider.as_ref(), Role::Admin)?;
    let client = ApiClient::new(&common::unreachable_base_url()?, provider.clone())?;

    assert_eq!(logout(&client).await, Route::Login);
    assert!(provider.token().is_none());
    assert!(provider.user_raw().is_none());
    Ok(())
}

#[tokio::test]
async fn logout_without_token_skips_the_server() -> Result<()> {
    let server = common::spawn_backend().await?;
    let (client, provider) = server.client()?;

    assert_eq!(logout(&client).await, Route::Login);
    assert!(server.state.requests_to("/api/auth/logout").is_empty());
    assert!(!provider.is_present());
    Ok(())
}
