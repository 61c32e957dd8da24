// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The session manager and its auth actions.

use std::sync::Arc;

use ncaaa_core::{SessionState, User, UserEnvelope};
use ncaaa_http::{endpoints, ApiClient};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::auto_refresh::{AutoRefresh, AutoRefreshConfig};

/// Outcome of a login or register attempt.
///
/// Business rejections (bad credentials, taken email) are data, not
/// errors: the server-supplied message is carried so the caller can show
/// it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
	Authenticated(User),
	Rejected(String),
}

impl AuthOutcome {
	pub fn is_authenticated(&self) -> bool {
		matches!(self, AuthOutcome::Authenticated(_))
	}

	/// The rejection message, if the attempt was rejected.
	pub fn rejection(&self) -> Option<&str> {
		match self {
			AuthOutcome::Rejected(message) => Some(message),
			AuthOutcome::Authenticated(_) => None,
		}
	}
}

/// Clears the `auth_loading` flag when dropped, so every exit path of an
/// auth action restores it.
struct AuthLoadingGuard {
	state: Arc<SessionState>,
}

impl AuthLoadingGuard {
	fn engage(state: &Arc<SessionState>) -> Self {
		state.set_auth_loading(true);
		Self {
			state: Arc::clone(state),
		}
	}
}

impl Drop for AuthLoadingGuard {
	fn drop(&mut self) {
		self.state.set_auth_loading(false);
	}
}

/// Drives the client-side session against the backend's auth endpoints.
///
/// The manager shares its [`SessionState`] with the [`ApiClient`] it is
/// built from, so the client's 401 recovery path sees the same logged-in
/// flag this manager maintains.
#[derive(Debug, Clone)]
pub struct SessionManager {
	api: ApiClient,
	state: Arc<SessionState>,
}

impl SessionManager {
	pub fn new(api: ApiClient) -> Self {
		let state = Arc::clone(api.session());
		Self { api, state }
	}

	pub fn api(&self) -> &ApiClient {
		&self.api
	}

	pub fn state(&self) -> &Arc<SessionState> {
		&self.state
	}

	/// One-time session bootstrap: fetch a CSRF token, then ask the server
	/// who we are. Any failure leaves the session anonymous. The
	/// `initializing` flag is finished on every path and never re-enters.
	pub async fn bootstrap(&self) {
		if !self.fetch_csrf_token().await {
			warn!("could not fetch CSRF token during bootstrap");
		}

		match self.fetch_me().await {
			Some(user) => {
				info!(user_id = user.id, "session restored");
				self.state.set_user(Some(user)).await;
			}
			None => {
				debug!("no active session");
				self.state.set_user(None).await;
			}
		}

		self.state.finish_initializing();
	}

	/// Attempts a credential login.
	///
	/// Never returns an error: rejections carry the server-supplied
	/// message, and the current user is left untouched on failure.
	pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
		self.authenticate(
			endpoints::LOGIN,
			&json!({ "email": email, "password": password }),
			"Login failed",
		)
		.await
	}

	/// Attempts an account registration. Same contract as [`login`].
	///
	/// [`login`]: SessionManager::login
	pub async fn register<T: Serialize + ?Sized>(&self, payload: &T) -> AuthOutcome {
		self.authenticate(endpoints::REGISTER, payload, "Registration failed")
			.await
	}

	async fn authenticate<T: Serialize + ?Sized>(
		&self,
		endpoint: &str,
		payload: &T,
		fallback_message: &str,
	) -> AuthOutcome {
		let _guard = AuthLoadingGuard::engage(&self.state);

		if !self.fetch_csrf_token().await {
			warn!(endpoint, "could not fetch CSRF token before auth request");
		}

		match self.api.post(endpoint, payload).await {
			Ok(resp) => match resp.json::<UserEnvelope>() {
				Ok(UserEnvelope { user: Some(user) }) => {
					info!(user_id = user.id, endpoint, "authenticated");
					self.state.set_user(Some(user.clone())).await;
					AuthOutcome::Authenticated(user)
				}
				_ => {
					warn!(endpoint, "auth response did not contain a user");
					AuthOutcome::Rejected(fallback_message.to_string())
				}
			},
			Err(e) => {
				debug!(endpoint, error = %e, "auth request rejected");
				let message = e
					.server_message()
					.unwrap_or(fallback_message)
					.to_string();
				AuthOutcome::Rejected(message)
			}
		}
	}

	/// Logs out. The network call is best-effort: the local session is
	/// cleared whether or not the server acknowledged it.
	pub async fn logout(&self) {
		let _guard = AuthLoadingGuard::engage(&self.state);

		if let Err(e) = self.api.post_empty(endpoints::LOGOUT).await {
			warn!(error = %e, "logout request failed, clearing local session anyway");
		}
		self.state.set_user(None).await;
		info!("logged out");
	}

	/// Passive re-validation: re-fetches the current user and clears the
	/// session silently when the server no longer recognizes it.
	pub async fn refresh_user(&self) {
		let user = self.fetch_me().await;
		self.state.set_user(user).await;
	}

	/// Fetches a fresh CSRF token into the shared cookie jar. Exposed so
	/// callers can re-arm the token manually. Returns whether the fetch
	/// succeeded.
	pub async fn fetch_csrf_token(&self) -> bool {
		match self.api.get(endpoints::CSRF_TOKEN).await {
			Ok(_) => true,
			Err(e) => {
				debug!(error = %e, "CSRF token fetch failed");
				false
			}
		}
	}

	/// Spawns a background task that keeps this manager's session warm.
	///
	/// The returned handle owns the task; calling [`AutoRefresh::stop`]
	/// tears the loop down. The loop also exits on its own once the
	/// session becomes anonymous.
	pub fn start_auto_refresh(&self, config: AutoRefreshConfig) -> AutoRefresh {
		AutoRefresh::spawn(self.api.clone(), config)
	}

	async fn fetch_me(&self) -> Option<User> {
		match self.api.get(endpoints::ME).await {
			Ok(resp) => match resp.json::<UserEnvelope>() {
				Ok(envelope) => envelope.user,
				Err(e) => {
					warn!(error = %e, "malformed /me response");
					None
				}
			},
			Err(e) => {
				debug!(error = %e, "/me request failed");
				None
			}
		}
	}
}
