// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed accessors for the NCAAA accreditation data endpoints.
//!
//! These are thin wrappers over [`ncaaa_http::ApiClient`] for the two
//! collection endpoints the admin front end reads. The backend wraps
//! collections in a `{ success, <collection>, error? }` envelope and
//! reports failures in-band with `success: false`, so both transport
//! errors and backend-reported failures surface here as [`ApiError`].

mod courses;
mod error;
mod researches;

pub use courses::{fetch_courses, Course};
pub use error::{ApiError, Result};
pub use researches::fetch_researches;
