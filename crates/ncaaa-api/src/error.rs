// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the accreditation data accessors.

use thiserror::Error;

/// Errors surfaced by the data endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
	/// Transport-level failure (includes the client's retry machinery
	/// giving up).
	#[error(transparent)]
	Http(#[from] ncaaa_http::HttpError),

	/// The backend answered 200 but reported `success: false`.
	#[error("backend error: {0}")]
	Backend(String),
}

/// Result type alias for data endpoint operations.
pub type Result<T> = std::result::Result<T, ApiError>;
