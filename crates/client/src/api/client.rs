//! Authenticated request executor
//!
//! Wraps a single outbound call with the client's whole retry policy: one
//! re-authentication when a cached session token turns out stale, and
//! nothing else. Rate limiting is a caller-visible backpressure signal and
//! is surfaced immediately; every other non-2xx status passes through
//! unclassified.

use std::sync::Arc;

use citypermit_domain::{CityPermitError, Result};
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::auth::{authorization_value, SessionTokenProvider};
use super::decode::{decode_body, parse_retry_after};
use crate::http::HttpClient;

/// Immutable specification of one outbound call
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<Value>,
    requires_auth: bool,
}

impl RequestDescriptor {
    /// Describe an authenticated call with no body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, requires_auth: true }
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Mark the call as not requiring a session token
    ///
    /// A 401/403 on such a call is a plain HTTP error, not a trigger for
    /// re-authentication.
    #[must_use]
    pub fn unauthenticated(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// HTTP method of the call
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path, appended to the base endpoint
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether a session token is attached
    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }
}

/// Authenticated request executor
pub struct ApiClient {
    http: HttpClient,
    auth: Arc<dyn SessionTokenProvider>,
    base_url: String,
}

impl ApiClient {
    /// Create a new executor
    ///
    /// # Arguments
    ///
    /// * `http` - Injected transport (shared by cloning, never closed here)
    /// * `auth` - Session token provider
    /// * `base_url` - Service endpoint; a trailing slash is stripped
    pub fn new(
        http: HttpClient,
        auth: Arc<dyn SessionTokenProvider>,
        base_url: impl Into<String>,
    ) -> Self {
        Self { http, auth, base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    /// Execute a described call and decode its response
    ///
    /// # Returns
    ///
    /// The decoded JSON payload, or `None` for empty-body responses.
    ///
    /// # Errors
    ///
    /// - `Auth` when re-authentication was attempted once and the retried
    ///   call was still rejected
    /// - `RateLimit` on 429, carrying the `Retry-After` hint
    /// - `Http` for any other non-2xx status, unmodified
    /// - `Network` for transport failures
    /// - `Parse` for malformed JSON bodies
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Option<Value>> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let token = if descriptor.requires_auth {
                Some(self.auth.ensure_authenticated().await?)
            } else {
                None
            };

            let url = format!("{}{}", self.base_url, descriptor.path);
            let mut request = self
                .http
                .request(descriptor.method.clone(), &url)
                .header(header::ACCEPT, "application/json");
            if let Some(token) = token.as_deref() {
                request = request.header(header::AUTHORIZATION, authorization_value(token));
            }
            if let Some(body) = &descriptor.body {
                request = request.json(body);
            }

            let response = self.http.send(request).await?;
            let status = response.status();

            // 429 is checked first: a rate-limited response must not burn
            // the single auth retry.
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(CityPermitError::RateLimit {
                    retry_after: parse_retry_after(response.headers()),
                });
            }

            if descriptor.requires_auth
                && (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN)
            {
                self.auth.invalidate().await;
                if attempt == 1 {
                    debug!("session rejected, re-authenticating");
                    continue;
                }
                warn!(%status, "authentication still rejected after re-login");
                return Err(CityPermitError::Auth("authentication failed".into()));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(CityPermitError::Http { status: status.as_u16(), body });
            }

            let text = response.text().await.map_err(|err| {
                CityPermitError::Network(format!("failed to read response body: {err}"))
            })?;
            return decode_body(&text);
        }
    }
}
