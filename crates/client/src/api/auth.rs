//! Session authentication for the CityPermit service
//!
//! The service hands out an opaque session token at login; every
//! authenticated call echoes it back base64-encoded in the `Authorization`
//! header. The token is the only mutable state shared between concurrent
//! requests: it is written here on login success and cleared by the executor
//! when the service rejects it.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use citypermit_domain::{CityPermitError, Credentials, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::decode::{decode_body, parse_retry_after};
use crate::http::HttpClient;

/// Path of the login endpoint (GET discovers media types, POST logs in).
const LOGIN_PATH: &str = "/login";
/// Login method discriminator expected by the service.
const LOGIN_METHOD: &str = "Pas";
/// `LoginStatus` value the service uses for rejected credentials.
const LOGIN_STATUS_FAILED: i64 = 2;

/// Trait for providing session tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait SessionTokenProvider: Send + Sync {
    /// Return a valid session token, logging in first when none is cached
    async fn ensure_authenticated(&self) -> Result<String>;

    /// Drop the cached token so the next call re-authenticates
    async fn invalidate(&self);
}

/// Session authenticator with token caching
///
/// At most one login attempt is in flight per instance: concurrent callers
/// that observe an empty cache serialize on the login lock and re-check the
/// cache before logging in themselves.
pub struct SessionAuth {
    http: HttpClient,
    credentials: Credentials,
    permit_media_type_id: RwLock<Option<i64>>,
    token: RwLock<Option<String>>,
    login_lock: Mutex<()>,
}

impl SessionAuth {
    /// Create a new session authenticator
    ///
    /// # Arguments
    ///
    /// * `http` - Injected transport, shared with the rest of the client
    /// * `credentials` - Validated login credentials and base endpoint
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        Self {
            http,
            credentials,
            permit_media_type_id: RwLock::new(None),
            token: RwLock::new(None),
            login_lock: Mutex::new(()),
        }
    }

    /// Skip permit-media-type discovery by configuring the id up front
    #[must_use]
    pub fn with_permit_media_type_id(self, type_id: i64) -> Self {
        Self { permit_media_type_id: RwLock::new(Some(type_id)), ..self }
    }

    async fn login(&self) -> Result<String> {
        let type_id = self.ensure_media_type_id().await?;

        let url = format!("{}{}", self.credentials.base_url(), LOGIN_PATH);
        let payload = json!({
            "identifier": self.credentials.username(),
            "loginMethod": LOGIN_METHOD,
            "password": self.credentials.password(),
            "permitMediaTypeID": type_id,
        });

        let response = self.http.send(self.http.request(Method::POST, &url).json(&payload)).await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CityPermitError::RateLimit {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(CityPermitError::Auth(format!("login returned status {status}")));
        }

        let text = response.text().await.map_err(|err| {
            CityPermitError::Network(format!("failed to read login response: {err}"))
        })?;
        let payload = decode_body(&text)
            .map_err(|_| CityPermitError::Auth("login response is not valid JSON".into()))?
            .ok_or_else(|| CityPermitError::Auth("login response was empty".into()))?;
        let data = payload
            .as_object()
            .ok_or_else(|| CityPermitError::Auth("unexpected login response shape".into()))?;

        if data.get("LoginStatus").and_then(Value::as_i64) == Some(LOGIN_STATUS_FAILED) {
            let message = data
                .get("ErrorMessage")
                .and_then(Value::as_str)
                .unwrap_or("unknown authentication error");
            return Err(CityPermitError::Auth(message.to_string()));
        }

        let token = data
            .get("Token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| CityPermitError::Auth("login response carried no token".into()))?;

        info!("authenticated against CityPermit service");
        Ok(token.to_string())
    }

    /// Resolve the permit media type id, discovering it once if unset
    async fn ensure_media_type_id(&self) -> Result<i64> {
        if let Some(type_id) = *self.permit_media_type_id.read().await {
            return Ok(type_id);
        }

        debug!("discovering permit media type id");
        let url = format!("{}{}", self.credentials.base_url(), LOGIN_PATH);
        let response = self.http.send(self.http.request(Method::GET, &url)).await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CityPermitError::RateLimit {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(CityPermitError::Auth(format!(
                "media type discovery returned status {status}"
            )));
        }

        let text = response.text().await.map_err(|err| {
            CityPermitError::Network(format!("failed to read login response: {err}"))
        })?;
        let payload = decode_body(&text)
            .map_err(|_| CityPermitError::Auth("login response is not valid JSON".into()))?
            .ok_or_else(|| CityPermitError::Auth("login response was empty".into()))?;

        let types = payload
            .get("PermitMediaTypes")
            .and_then(Value::as_array)
            .filter(|types| !types.is_empty())
            .ok_or_else(|| CityPermitError::Auth("no permit media types available".into()))?;

        let type_id = match types[0].get("ID") {
            Some(Value::Number(number)) => number.as_i64(),
            Some(Value::String(raw)) => raw.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| CityPermitError::Auth("invalid permit media type ID".into()))?;

        *self.permit_media_type_id.write().await = Some(type_id);
        Ok(type_id)
    }
}

#[async_trait]
impl SessionTokenProvider for SessionAuth {
    async fn ensure_authenticated(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }

        let _guard = self.login_lock.lock().await;
        // Another caller may have logged in while we waited for the lock.
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }

        let token = self.login().await?;
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        *self.token.write().await = None;
    }
}

/// Build the `Authorization` header value for a session token
pub(crate) fn authorization_value(token: &str) -> String {
    format!("Token {}", BASE64.encode(token.as_bytes()))
}
