// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Proactive session refresh.
//!
//! While a user is logged in, a background task posts `/refresh` on a
//! fixed interval so the access token is extended before it expires.
//! Failures here are logged and swallowed: only the reactive 401 path in
//! the HTTP client is allowed to force a logout. The task tears itself
//! down at the first tick that observes an anonymous session, so no timer
//! outlives the login it was started for.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ncaaa_http::{endpoints, ApiClient};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Configuration for the proactive refresh task.
#[derive(Debug, Clone)]
pub struct AutoRefreshConfig {
	/// Interval between refresh calls. Defaults to 25 minutes, comfortably
	/// inside the backend's 30 minute access-token lifetime.
	pub interval: Duration,
}

impl Default for AutoRefreshConfig {
	fn default() -> Self {
		Self {
			interval: Duration::from_secs(25 * 60),
		}
	}
}

/// Handle to the background refresh task.
#[derive(Debug)]
pub struct AutoRefresh {
	refreshes_attempted: Arc<AtomicU64>,
	task_handle: Option<JoinHandle<()>>,
	shutdown_tx: Option<mpsc::Sender<()>>,
}

impl AutoRefresh {
	/// Spawns the refresh loop in a background task and returns the handle
	/// owning it. Must be called from within a tokio runtime.
	pub fn spawn(api: ApiClient, config: AutoRefreshConfig) -> Self {
		let refreshes_attempted = Arc::new(AtomicU64::new(0));
		let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

		let counter = Arc::clone(&refreshes_attempted);
		let handle = tokio::spawn(async move {
			run_refresh_loop(api, config, counter, shutdown_rx).await;
		});

		Self {
			refreshes_attempted,
			task_handle: Some(handle),
			shutdown_tx: Some(shutdown_tx),
		}
	}

	/// Stops the refresh loop and waits for the task to finish.
	pub async fn stop(&mut self) {
		if let Some(tx) = self.shutdown_tx.take() {
			let _ = tx.send(()).await;
		}
		if let Some(handle) = self.task_handle.take() {
			if let Err(e) = handle.await {
				warn!(error = %e, "auto-refresh task did not shut down cleanly");
			}
		}
	}

	/// How many refresh calls have been attempted since start.
	pub fn refreshes_attempted(&self) -> u64 {
		self.refreshes_attempted.load(Ordering::SeqCst)
	}
}

async fn run_refresh_loop(
	api: ApiClient,
	config: AutoRefreshConfig,
	refreshes_attempted: Arc<AtomicU64>,
	mut shutdown_rx: mpsc::Receiver<()>,
) {
	let mut interval = tokio::time::interval(config.interval);
	// The first tick of a tokio interval fires immediately; consume it so
	// the first refresh happens one full interval after login.
	interval.tick().await;

	loop {
		tokio::select! {
			_ = shutdown_rx.recv() => {
				debug!("auto-refresh shutting down");
				break;
			}
			_ = interval.tick() => {
				if !api.session().is_authenticated().await {
					debug!("session is anonymous, stopping auto-refresh");
					break;
				}

				refreshes_attempted.fetch_add(1, Ordering::SeqCst);
				match api.post_empty(endpoints::REFRESH).await {
					Ok(_) => debug!("proactive session refresh succeeded"),
					// Proactive failures do not clear the session; the
					// reactive 401 path decides when a logout is forced.
					Err(e) => warn!(error = %e, "proactive session refresh failed"),
				}
			}
		}
	}
}
