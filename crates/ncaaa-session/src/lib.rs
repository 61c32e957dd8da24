// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session manager for the NCAAA accreditation client.
//!
//! Owns the lifecycle of the client-side session on top of
//! [`ncaaa_http::ApiClient`]:
//!
//! - **Bootstrap**: the one-time startup check of whether a previously
//!   authenticated user is still recognized, finishing the `initializing`
//!   flag exactly once.
//! - **Auth actions**: login, register, logout, and passive re-validation,
//!   all returning structured outcomes instead of errors so callers can
//!   render server messages without special-casing failures.
//! - **Auto-refresh**: a background task that proactively extends the
//!   session at a fixed interval while a user is logged in.
//!
//! # Example
//!
//! ```ignore
//! use ncaaa_http::ApiClient;
//! use ncaaa_session::{AuthOutcome, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::builder()
//!         .base_url("https://accreditation.example.edu/api")
//!         .build()?;
//!     let session = SessionManager::new(api);
//!
//!     session.bootstrap().await;
//!     match session.login("dean@example.edu", "hunter2").await {
//!         AuthOutcome::Authenticated(user) => println!("welcome {}", user.email),
//!         AuthOutcome::Rejected(message) => eprintln!("login failed: {message}"),
//!     }
//!     Ok(())
//! }
//! ```

mod auto_refresh;
mod manager;

pub use auto_refresh::{AutoRefresh, AutoRefreshConfig};
pub use manager::{AuthOutcome, SessionManager};
