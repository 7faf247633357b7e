//! CityPermit API client
//!
//! This module provides the authenticated request pipeline for the
//! CityPermit parking-permit service and the per-endpoint operations built
//! on top of it.
//!
//! # Architecture
//!
//! - Uses the [`crate::http::HttpClient`] wrapper (no direct reqwest)
//! - Session-token authentication with a single retry on 401/403
//! - Rate limiting (429) surfaced to the caller, never retried here
//! - Dynamic permit payloads decode to `serde_json::Value` and map into
//!   `citypermit-domain` records

pub mod auth;
pub mod client;
pub mod decode;
pub mod operations;

pub use auth::{SessionAuth, SessionTokenProvider};
pub use client::{ApiClient, RequestDescriptor};
pub use decode::decode_body;
pub use operations::{CityPermitApi, CreateReservation};
