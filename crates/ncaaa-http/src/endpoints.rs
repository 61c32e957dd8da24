// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backend endpoint paths.
//!
//! The auth/session endpoints are excluded from the 401 recovery path: a
//! 401 from any of them is the answer, not something a token refresh can
//! fix, and retrying them would recurse.

/// Issues a fresh CSRF token into the cookie jar.
pub const CSRF_TOKEN: &str = "/csrf-token";

/// Returns the currently authenticated user, if any.
pub const ME: &str = "/me";

/// Credential login.
pub const LOGIN: &str = "/login";

/// Account registration.
pub const REGISTER: &str = "/register";

/// Session logout.
pub const LOGOUT: &str = "/logout";

/// Access-token refresh.
pub const REFRESH: &str = "/refresh";

const AUTH_ENDPOINTS: &[&str] = &[CSRF_TOKEN, ME, LOGIN, REGISTER, LOGOUT, REFRESH];

/// Whether `path` is one of the auth/session endpoints.
pub fn is_auth_endpoint(path: &str) -> bool {
	let path = path.split('?').next().unwrap_or(path);
	AUTH_ENDPOINTS.contains(&path)
}
