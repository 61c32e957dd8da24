// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The shared in-memory session container.
//!
//! One [`SessionState`] is shared (behind an `Arc`) between the session
//! manager, which owns every ordinary transition, and the HTTP client,
//! whose 401 recovery path reads the logged-in flag and clears the user
//! when a session refresh fails for good.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::types::User;

/// Client-side session state.
///
/// - `user` is `Some` while a user is considered logged in.
/// - `initializing` is `true` only until the first bootstrap finishes;
///   the transition to `false` is one-way.
/// - `auth_loading` is `true` while a login/register/logout call is in
///   flight, for callers that want to disable their submit paths.
#[derive(Debug)]
pub struct SessionState {
	user: RwLock<Option<User>>,
	initializing: AtomicBool,
	auth_loading: AtomicBool,
}

impl SessionState {
	pub fn new() -> Self {
		Self {
			user: RwLock::new(None),
			initializing: AtomicBool::new(true),
			auth_loading: AtomicBool::new(false),
		}
	}

	/// A clone of the current user, if any.
	pub async fn current_user(&self) -> Option<User> {
		self.user.read().await.clone()
	}

	/// Whether a user is currently considered logged in.
	pub async fn is_authenticated(&self) -> bool {
		self.user.read().await.is_some()
	}

	/// Replaces the current user.
	pub async fn set_user(&self, user: Option<User>) {
		*self.user.write().await = user;
	}

	/// Clears the current user. Used by the HTTP client when a session
	/// refresh fails irrecoverably.
	pub async fn clear_user(&self) {
		*self.user.write().await = None;
	}

	/// Whether the first session bootstrap is still in progress.
	pub fn is_initializing(&self) -> bool {
		self.initializing.load(Ordering::SeqCst)
	}

	/// Marks the bootstrap as finished. There is deliberately no way to
	/// re-enter the initializing state.
	pub fn finish_initializing(&self) {
		self.initializing.store(false, Ordering::SeqCst);
	}

	/// Whether an auth action (login/register/logout) is in flight.
	pub fn is_auth_loading(&self) -> bool {
		self.auth_loading.load(Ordering::SeqCst)
	}

	pub fn set_auth_loading(&self, loading: bool) {
		self.auth_loading.store(loading, Ordering::SeqCst);
	}
}

impl Default for SessionState {
	fn default() -> Self {
		Self::new()
	}
}
