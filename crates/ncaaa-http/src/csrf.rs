// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CSRF cookie handling.
//!
//! The backend delivers the CSRF token in a cookie and expects it echoed
//! back in a header on every state-changing request. The cookie jar only
//! exposes a joined `Cookie` header line for a URL, so the token is
//! recovered by parsing that line.

use reqwest::Method;

/// Default name of the cookie the backend stores the CSRF token in.
pub(crate) const DEFAULT_CSRF_COOKIE: &str = "csrf_access_token";

/// Default name of the header the token is mirrored into.
pub(crate) const DEFAULT_CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Whether requests with this method must carry the CSRF header.
/// GET/HEAD and other safe methods are never mutated.
pub(crate) fn is_state_changing(method: &Method) -> bool {
	matches!(
		*method,
		Method::POST | Method::PUT | Method::PATCH | Method::DELETE
	)
}

/// Extracts a cookie value from a `Cookie` header line (`a=1; b=2`).
pub(crate) fn cookie_value(header: &str, name: &str) -> Option<String> {
	header
		.split(';')
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(key, _)| *key == name)
		.map(|(_, value)| value.to_string())
}
