// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-flight coordination for the session refresh call.
//!
//! The first caller starts the operation; every caller that arrives while
//! it is in flight awaits the same shared future and observes the same
//! outcome. The slot is cleared once the operation settles, so a later
//! burst of 401s starts a fresh refresh.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::HttpError;

/// Outcome shared between every caller of one in-flight operation.
pub(crate) type SharedOutcome = std::result::Result<(), Arc<HttpError>>;

type InFlight = Shared<BoxFuture<'static, SharedOutcome>>;

/// A promise-sharing primitive: at most one execution of the guarded
/// operation is in flight at any time.
#[derive(Default)]
pub(crate) struct SingleFlight {
	slot: Mutex<Option<InFlight>>,
}

impl std::fmt::Debug for SingleFlight {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SingleFlight").finish_non_exhaustive()
	}
}

impl SingleFlight {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Runs `op`, or joins the execution already in flight.
	///
	/// The slot is always cleared after the operation settles, whichever
	/// caller gets there first, so failures cannot wedge the coordinator.
	pub(crate) async fn run<F>(&self, op: F) -> SharedOutcome
	where
		F: Future<Output = std::result::Result<(), HttpError>> + Send + 'static,
	{
		let in_flight = {
			let mut slot = self.slot.lock().await;
			match slot.as_ref() {
				Some(existing) => {
					debug!("joining in-flight session refresh");
					existing.clone()
				}
				None => {
					let fut: InFlight = op.map(|res| res.map_err(Arc::new)).boxed().shared();
					*slot = Some(fut.clone());
					fut
				}
			}
		};

		let outcome = in_flight.clone().await;

		let mut slot = self.slot.lock().await;
		if slot.as_ref().is_some_and(|f| f.ptr_eq(&in_flight)) {
			*slot = None;
		}

		outcome
	}
}
