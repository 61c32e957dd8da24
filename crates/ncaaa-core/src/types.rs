// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types shared across the client crates.

use serde::{Deserialize, Serialize};

/// An authenticated account as returned by the backend.
///
/// Unknown fields are ignored so the client keeps working when the server
/// grows its user payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub id: i64,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
}

/// Envelope for session-bearing responses (`/me`, `/login`, `/register`).
///
/// The backend wraps the account under a `user` key; the key may be absent
/// or `null` for anonymous visitors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEnvelope {
	#[serde(default)]
	pub user: Option<User>,
}

/// Envelope for error responses.
///
/// The backend is inconsistent about the key it reports errors under:
/// business failures use `error` or `message`, while the JWT/CSRF layer
/// uses `msg`. All three are collected here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub msg: Option<String>,
}

impl ErrorEnvelope {
	/// Parses an error body leniently: anything that is not a recognizable
	/// JSON error object yields an empty envelope rather than a failure.
	pub fn from_json_str(body: &str) -> Self {
		serde_json::from_str(body).unwrap_or_default()
	}

	/// The error text, preferring `error` over `message` over `msg`.
	pub fn text(&self) -> Option<&str> {
		self.error
			.as_deref()
			.or(self.message.as_deref())
			.or(self.msg.as_deref())
	}

	/// Whether this error identifies a CSRF failure.
	///
	/// The JWT layer reports CSRF problems as 403s with messages like
	/// "Missing CSRF token" or "CSRF double submit tokens do not match".
	pub fn mentions_csrf(&self) -> bool {
		[&self.error, &self.message, &self.msg]
			.into_iter()
			.flatten()
			.any(|text| text.contains("CSRF"))
	}
}
