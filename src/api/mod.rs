//! Bearer-authenticated HTTP client for the dashboard backend.
//!
//! Resource handles (`client.companies()`, `client.users()`, ...) borrow the client
//! and read the current token from the session provider on every request.

pub mod companies;
pub mod departments;
pub mod districts;
pub mod equipments;
pub mod format;
pub mod job_titles;
pub mod lookups;
pub mod pagination;
pub mod positions;
pub mod profile;
pub mod users;
pub mod validate;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::session::SessionProvider;

pub use pagination::{Page, PageRequest, SortDir};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<dyn SessionProvider>) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        })
    }

    /// Client pointed at the configured backend
    pub fn from_config(session: Arc<dyn SessionProvider>) -> Result<Self, ClientError> {
        Self::new(&crate::config::config().api.base_url, session)
    }

    pub fn session(&self) -> &dyn SessionProvider {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    /// Request with JSON content type and, when a token is stored, a bearer header
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        if crate::config::config().api.enable_request_logging {
            tracing::debug!("{} {}", method, url);
        }

        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        let response = ensure_success(response, fallback).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("Unexpected response body from {}: {}", path, e);
            ClientError::InvalidResponse(fallback.to_string())
        })
    }

    /// Listing endpoint answering a JSON array; anything else counts as empty
    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<Vec<T>, ClientError> {
        match self.get_json::<Value>(path, &[], fallback).await? {
            data @ Value::Array(_) => serde_json::from_value(data).map_err(|e| {
                tracing::warn!("Unexpected record shape from {}: {}", path, e);
                ClientError::InvalidResponse(fallback.to_string())
            }),
            _ => Ok(Vec::new()),
        }
    }

    /// Send a JSON body and return whatever JSON came back (`Value::Null` for an empty body)
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Value, ClientError> {
        let response = self.request(method, path)?.json(body).send().await?;
        let response = ensure_success(response, fallback).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// Username recorded as `createdBy`/`updatedBy` on audited writes;
    /// `admin` when the stored user has none
    pub(crate) fn acting_username(&self) -> String {
        self.session
            .user_raw()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|user| user.get("username").and_then(Value::as_str).map(str::to_string))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "admin".to_string())
    }
}

/// Field deserializer that reads an explicit JSON `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Map a non-2xx response to a [`ClientError`], preferring the server's `message`
pub(crate) async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    tracing::debug!("request failed with {}: {}", status, message);

    Err(match status.as_u16() {
        401 => ClientError::Unauthorized(message),
        403 => ClientError::Forbidden(message),
        code => ClientError::Api { status: code, message },
    })
}

/// RFC 3339 timestamp in the same shape browsers produce for `toISOString`
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
