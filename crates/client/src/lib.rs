//! # CityPermit Client
//!
//! Async client for the CityPermit parking-permit service.
//!
//! This crate contains all impure code of the workspace:
//! - HTTP transport wrapper over `reqwest`
//! - Session authentication and token lifecycle
//! - The authenticated request executor and response decoding
//! - Per-endpoint operations mapping payloads to `citypermit-domain` records
//!
//! ## Architecture
//! - The transport ([`HttpClient`]) is supplied by the caller and shared by
//!   cloning; the client never constructs or closes it on its own
//! - [`SessionAuth`] owns the session token; the executor clears it on
//!   authentication failures and retries exactly once
//! - Rate limiting (429) is never retried automatically
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use citypermit_client::{ApiClient, CityPermitApi, HttpClient, SessionAuth};
//! use citypermit_domain::Credentials;
//!
//! # async fn run() -> citypermit_domain::Result<()> {
//! let credentials = Credentials::new("user", "pass", "https://example.test")?;
//! let http = HttpClient::new()?;
//! let auth = Arc::new(SessionAuth::new(http.clone(), credentials.clone()));
//! let client = Arc::new(ApiClient::new(http, auth, credentials.base_url()));
//! let api = CityPermitApi::new(client);
//!
//! let account = api.account().await?;
//! tracing::info!(balance = account.remaining_time, "account fetched");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod http;

// Re-export commonly used items
pub use api::{
    ApiClient, CityPermitApi, CreateReservation, RequestDescriptor, SessionAuth,
    SessionTokenProvider,
};
pub use http::HttpClient;
