// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the NCAAA accreditation client.
//!
//! This crate holds the data model shared between the HTTP client
//! (`ncaaa-http`) and the session manager (`ncaaa-session`):
//!
//! - [`User`]: the authenticated account returned by the backend
//! - [`SessionState`]: the shared in-memory session container
//! - Wire envelopes for session-bearing and error responses

mod session;
mod types;

pub use session::SessionState;
pub use types::{ErrorEnvelope, User, UserEnvelope};
