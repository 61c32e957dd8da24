// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The authenticated API client.
//!
//! Requests flow through one pipeline (`execute`) that owns both recovery
//! policies:
//!
//! 1. A 403 carrying a CSRF error message refetches the token once via
//!    `GET /csrf-token` and replays the request with the fresh header.
//! 2. A 401 on a protected endpoint, while a user is considered logged in,
//!    joins the single-flight `POST /refresh` and replays once on success.
//!    A failed refresh clears the shared session and fails every request
//!    that waited on it.
//!
//! Both policies are bounded by an immutable [`RetryContext`] threaded
//! through the pipeline: each category replays at most once per original
//! request, so a second failure of the same kind always propagates.

use std::sync::Arc;
use std::time::Duration;

use ncaaa_core::{ErrorEnvelope, SessionState};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::csrf::{self, DEFAULT_CSRF_COOKIE, DEFAULT_CSRF_HEADER};
use crate::endpoints;
use crate::error::{HttpError, Result};
use crate::single_flight::SingleFlight;

/// Default request timeout, matching the browser client this replaces.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Builder for [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
	base_url: Option<String>,
	timeout: Duration,
	csrf_cookie: String,
	csrf_header: String,
	user_agent: String,
	session: Option<Arc<SessionState>>,
}

impl ApiClientBuilder {
	fn new() -> Self {
		Self {
			base_url: None,
			timeout: DEFAULT_TIMEOUT,
			csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
			csrf_header: DEFAULT_CSRF_HEADER.to_string(),
			user_agent: format!("ncaaa-client/{}", env!("CARGO_PKG_VERSION")),
			session: None,
		}
	}

	/// Sets the backend base URL (required). A trailing slash is stripped.
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	/// Overrides the default request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Overrides the cookie name the CSRF token is read from.
	pub fn csrf_cookie(mut self, name: impl Into<String>) -> Self {
		self.csrf_cookie = name.into();
		self
	}

	/// Overrides the header name the CSRF token is mirrored into.
	pub fn csrf_header(mut self, name: impl Into<String>) -> Self {
		self.csrf_header = name.into();
		self
	}

	/// Overrides the User-Agent string.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();
		self
	}

	/// Shares an existing session state instead of creating a fresh one.
	pub fn session(mut self, session: Arc<SessionState>) -> Self {
		self.session = Some(session);
		self
	}

	/// Builds the client.
	pub fn build(self) -> Result<ApiClient> {
		let base = self
			.base_url
			.ok_or_else(|| HttpError::InvalidBaseUrl("base URL is required".to_string()))?
			.trim_end_matches('/')
			.to_string();
		let origin =
			Url::parse(&base).map_err(|e| HttpError::InvalidBaseUrl(format!("{base}: {e}")))?;

		let jar = Arc::new(Jar::default());
		let http = reqwest::Client::builder()
			.user_agent(self.user_agent)
			.timeout(self.timeout)
			.cookie_provider(Arc::clone(&jar))
			.build()?;

		Ok(ApiClient {
			inner: Arc::new(Inner {
				http,
				base,
				origin,
				jar,
				session: self.session.unwrap_or_default(),
				refresh_gate: SingleFlight::new(),
				csrf_cookie: self.csrf_cookie,
				csrf_header: self.csrf_header,
			}),
		})
	}
}

#[derive(Debug)]
struct Inner {
	http: reqwest::Client,
	base: String,
	origin: Url,
	jar: Arc<Jar>,
	session: Arc<SessionState>,
	refresh_gate: SingleFlight,
	csrf_cookie: String,
	csrf_header: String,
}

/// Cookie-authenticated HTTP client for the accreditation backend.
///
/// Cheap to clone; clones share the cookie jar, the session state, and
/// the single-flight refresh coordinator.
#[derive(Debug, Clone)]
pub struct ApiClient {
	inner: Arc<Inner>,
}

/// An immutable description of one request, kept so the pipeline can
/// rebuild and replay it after a recovery step.
#[derive(Debug, Clone)]
struct RequestSpec {
	method: Method,
	path: String,
	body: Option<serde_json::Value>,
}

impl RequestSpec {
	fn new(method: Method, path: &str) -> Self {
		Self {
			method,
			path: path.to_string(),
			body: None,
		}
	}

	fn with_body(method: Method, path: &str, body: serde_json::Value) -> Self {
		Self {
			method,
			path: path.to_string(),
			body: Some(body),
		}
	}
}

/// Per-request retry state. Each recovery category fires at most once for
/// one original request; a replayed request carries the updated context.
#[derive(Debug, Clone, Copy, Default)]
struct RetryContext {
	csrf_replayed: bool,
	auth_replayed: bool,
}

/// A fully buffered response.
#[derive(Debug)]
pub struct ApiResponse {
	status: StatusCode,
	body: String,
}

impl ApiResponse {
	async fn from_response(resp: reqwest::Response) -> Result<Self> {
		let status = resp.status();
		let body = resp.text().await?;
		Ok(Self { status, body })
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// The raw response body.
	pub fn text(&self) -> &str {
		&self.body
	}

	/// Deserializes the body as JSON.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		Ok(serde_json::from_str(&self.body)?)
	}
}

impl ApiClient {
	pub fn builder() -> ApiClientBuilder {
		ApiClientBuilder::new()
	}

	/// The session state this client reads and, on irrecoverable 401,
	/// clears. Share it with the session manager.
	pub fn session(&self) -> &Arc<SessionState> {
		&self.inner.session
	}

	pub fn base_url(&self) -> &str {
		&self.inner.base
	}

	pub async fn get(&self, path: &str) -> Result<ApiResponse> {
		self.execute(RequestSpec::new(Method::GET, path)).await
	}

	pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
		let body = serde_json::to_value(body)?;
		self.execute(RequestSpec::with_body(Method::POST, path, body))
			.await
	}

	/// POST with an empty body (logout, refresh).
	pub async fn post_empty(&self, path: &str) -> Result<ApiResponse> {
		self.execute(RequestSpec::new(Method::POST, path)).await
	}

	pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
		let body = serde_json::to_value(body)?;
		self.execute(RequestSpec::with_body(Method::PUT, path, body))
			.await
	}

	pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
		let body = serde_json::to_value(body)?;
		self.execute(RequestSpec::with_body(Method::PATCH, path, body))
			.await
	}

	pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
		self.execute(RequestSpec::new(Method::DELETE, path)).await
	}

	/// The CSRF token currently held in the cookie jar, if any.
	pub(crate) fn csrf_token(&self) -> Option<String> {
		let header = self.inner.jar.cookies(&self.inner.origin)?;
		let header = header.to_str().ok()?;
		csrf::cookie_value(header, &self.inner.csrf_cookie)
	}

	/// The request pipeline: send, then apply at most one CSRF replay and
	/// at most one refresh-driven replay.
	async fn execute(&self, spec: RequestSpec) -> Result<ApiResponse> {
		let mut ctx = RetryContext::default();

		loop {
			let resp = self.send(&spec).await?;
			let status = resp.status();
			if status.is_success() {
				return ApiResponse::from_response(resp).await;
			}

			let body = resp.text().await.unwrap_or_default();
			let envelope = ErrorEnvelope::from_json_str(&body);

			if status == StatusCode::FORBIDDEN && envelope.mentions_csrf() && !ctx.csrf_replayed {
				ctx = RetryContext {
					csrf_replayed: true,
					..ctx
				};
				if self.refetch_csrf_token().await {
					debug!(path = %spec.path, "replaying request with fresh CSRF token");
					continue;
				}
				// Token refetch failed; fall through to the original 403.
			} else if status == StatusCode::UNAUTHORIZED
				&& !ctx.auth_replayed
				&& !endpoints::is_auth_endpoint(&spec.path)
				&& self.inner.session.is_authenticated().await
			{
				ctx = RetryContext {
					auth_replayed: true,
					..ctx
				};
				match self.refresh_session().await {
					Ok(()) => {
						debug!(path = %spec.path, "session refreshed, replaying request");
						continue;
					}
					Err(shared) => {
						warn!(path = %spec.path, "session refresh failed, clearing local session");
						self.inner.session.clear_user().await;
						return Err(HttpError::RefreshFailed(shared));
					}
				}
			}

			return Err(HttpError::Status {
				status: status.as_u16(),
				body: envelope,
			});
		}
	}

	/// Builds and sends one request. The CSRF header is injected for
	/// state-changing methods from whatever token the jar currently holds,
	/// so a replay after a token refetch picks up the fresh value.
	async fn send(&self, spec: &RequestSpec) -> Result<reqwest::Response> {
		let url = format!("{}{}", self.inner.base, spec.path);
		let mut req = self.inner.http.request(spec.method.clone(), url);

		if csrf::is_state_changing(&spec.method) {
			if let Some(token) = self.csrf_token() {
				req = req.header(&self.inner.csrf_header, token);
			}
		}
		if let Some(body) = &spec.body {
			req = req.json(body);
		}

		Ok(req.send().await?)
	}

	/// Fetches a fresh CSRF token into the cookie jar. Returns whether a
	/// token is now available.
	async fn refetch_csrf_token(&self) -> bool {
		let spec = RequestSpec::new(Method::GET, endpoints::CSRF_TOKEN);
		match self.send(&spec).await {
			Ok(resp) if resp.status().is_success() => self.csrf_token().is_some(),
			Ok(resp) => {
				warn!(status = %resp.status(), "CSRF token refetch rejected");
				false
			}
			Err(e) => {
				warn!(error = %e, "CSRF token refetch failed");
				false
			}
		}
	}

	/// Joins the single-flight `POST /refresh`. At most one refresh call is
	/// in flight across every clone of this client.
	async fn refresh_session(&self) -> std::result::Result<(), Arc<HttpError>> {
		let client = self.clone();
		self.inner
			.refresh_gate
			.run(async move {
				let spec = RequestSpec::new(Method::POST, endpoints::REFRESH);
				let resp = client.send(&spec).await?;
				let status = resp.status();
				if status.is_success() {
					debug!("session refresh succeeded");
					return Ok(());
				}
				let body = resp.text().await.unwrap_or_default();
				Err(HttpError::Status {
					status: status.as_u16(),
					body: ErrorEnvelope::from_json_str(&body),
				})
			})
			.await
	}
}
