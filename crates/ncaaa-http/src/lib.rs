// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated HTTP client for the NCAAA accreditation backend.
//!
//! This crate wraps `reqwest` with the request/retry contract the backend
//! expects from a cookie-authenticated browser client:
//!
//! - **Cookie credentials**: a shared cookie jar carries the access and
//!   CSRF cookies across requests, the way a browser does with
//!   `withCredentials`.
//! - **CSRF header injection**: state-changing requests (POST/PUT/PATCH/
//!   DELETE) mirror the CSRF cookie into the `X-CSRF-TOKEN` header.
//! - **One-shot CSRF recovery**: a 403 carrying a CSRF error message
//!   triggers a single token refetch and replay.
//! - **Single-flight 401 recovery**: a 401 on a protected endpoint, while
//!   a user is considered logged in, joins at most one in-flight
//!   `POST /refresh`; every request waiting on that refresh observes the
//!   same outcome.
//!
//! # Example
//!
//! ```ignore
//! use ncaaa_http::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .base_url("https://accreditation.example.edu/api")
//!         .build()?;
//!
//!     let resp = client.get("/ncaaa").await?;
//!     let courses: serde_json::Value = resp.json()?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod csrf;
pub mod endpoints;
mod error;
mod single_flight;

pub use client::{ApiClient, ApiClientBuilder, ApiResponse};
pub use error::{HttpError, Result};
