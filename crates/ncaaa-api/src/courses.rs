// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The accreditation course list (`GET /ncaaa`).

use ncaaa_http::ApiClient;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, Result};

/// One course in the accreditation course list. Only the fields the
/// course-list view reads are kept; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Course {
	pub course_id: i64,
	pub course_code: String,
	pub course_name: String,
}

#[derive(Debug, Deserialize)]
struct CoursesEnvelope {
	#[serde(default)]
	success: bool,
	#[serde(default)]
	courses: Vec<Course>,
	#[serde(default)]
	error: Option<String>,
}

/// Fetches the accreditation course list.
pub async fn fetch_courses(api: &ApiClient) -> Result<Vec<Course>> {
	let resp = api.get("/ncaaa").await?;
	let envelope: CoursesEnvelope = resp.json().map_err(ApiError::Http)?;

	if !envelope.success {
		let message = envelope
			.error
			.unwrap_or_else(|| "Failed to fetch courses".to_string());
		return Err(ApiError::Backend(message));
	}

	debug!(count = envelope.courses.len(), "fetched course list");
	Ok(envelope.courses)
}
