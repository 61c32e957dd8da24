// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The ORCID research list (`GET /orcid/researches`).
//!
//! The research records are passed through as raw JSON: the view treats
//! them as an opaque collection and the upstream ORCID shape changes
//! often enough that typing it here would only add churn.

use ncaaa_http::ApiClient;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, Result};

#[derive(Debug, Deserialize)]
struct ResearchesEnvelope {
	#[serde(default)]
	success: bool,
	#[serde(default)]
	researches: Vec<serde_json::Value>,
	#[serde(default)]
	error: Option<String>,
}

/// Fetches the research records linked through ORCID.
pub async fn fetch_researches(api: &ApiClient) -> Result<Vec<serde_json::Value>> {
	let resp = api.get("/orcid/researches").await?;
	let envelope: ResearchesEnvelope = resp.json().map_err(ApiError::Http)?;

	if !envelope.success {
		let message = envelope
			.error
			.unwrap_or_else(|| "Failed to fetch researches".to_string());
		return Err(ApiError::Backend(message));
	}

	debug!(count = envelope.researches.len(), "fetched research list");
	Ok(envelope.researches)
}
