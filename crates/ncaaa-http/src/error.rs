// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the HTTP client.

use std::sync::Arc;

use ncaaa_core::ErrorEnvelope;
use thiserror::Error;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum HttpError {
	/// Base URL is missing or unparseable.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// The request never produced a response (connect failure, timeout,
	/// TLS error). Never retried.
	#[error("HTTP request failed: {0}")]
	Request(#[from] reqwest::Error),

	/// The server answered with a terminal non-success status.
	#[error("server error ({status}): {}", .body.text().unwrap_or("unknown error"))]
	Status { status: u16, body: ErrorEnvelope },

	/// A 401 triggered a session refresh and the refresh itself failed.
	/// Every request that waited on that refresh receives the same shared
	/// failure.
	#[error("session refresh failed: {0}")]
	RefreshFailed(Arc<HttpError>),

	/// Request or response body could not be (de)serialized.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl HttpError {
	/// The HTTP status carried by this error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			HttpError::Status { status, .. } => Some(*status),
			HttpError::Request(e) => e.status().map(|s| s.as_u16()),
			HttpError::RefreshFailed(inner) => inner.status(),
			_ => None,
		}
	}

	/// The server-supplied error text, if the server sent one.
	pub fn server_message(&self) -> Option<&str> {
		match self {
			HttpError::Status { body, .. } => body.text(),
			HttpError::RefreshFailed(inner) => inner.server_message(),
			_ => None,
		}
	}
}

/// Result type alias for HTTP client operations.
pub type Result<T> = std::result::Result<T, HttpError>;
