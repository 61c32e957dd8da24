// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the full session flow.
//!
//! Tests cover:
//! - Bootstrap, login, and protected-call recovery working against one
//!   shared session state
//! - The reactive 401 path forcing a logout that the session manager
//!   observes
//! - Logged-out clients staying quiet (no refresh storms)

use std::time::Duration;

use ncaaa_http::ApiClient;
use ncaaa_session::{AutoRefreshConfig, SessionManager};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, SessionManager) {
	let server = MockServer::start().await;
	let api = ApiClient::builder()
		.base_url(server.uri())
		.build()
		.unwrap();
	(server, SessionManager::new(api))
}

async fn mount_csrf_token(server: &MockServer) {
	Mock::given(method("GET"))
		.and(path("/csrf-token"))
		.respond_with(
			ResponseTemplate::new(200).insert_header("set-cookie", "csrf_access_token=tok; Path=/"),
		)
		.mount(server)
		.await;
}

#[tokio::test]
async fn login_arms_the_401_recovery_path() {
	let (server, manager) = setup().await;
	mount_csrf_token(&server).await;

	Mock::given(method("POST"))
		.and(path("/login"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"user": {"id": 7, "email": "a@b.com"}})),
		)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/ncaaa"))
		// Two 401s: one for the anonymous probe, one for the post-login
		// request that gets recovered.
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "expired"})))
		.up_to_n_times(2)
		.with_priority(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/ncaaa"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "courses": []})))
		.with_priority(10)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/refresh"))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount(&server)
		.await;

	// Anonymous: a 401 on the protected endpoint is not recovered.
	let err = manager.api().get("/ncaaa").await.unwrap_err();
	assert_eq!(err.status(), Some(401));

	// Logged in: the same 401 now refreshes and replays.
	let outcome = manager.login("a@b.com", "pw").await;
	assert!(outcome.is_authenticated());

	let resp = manager.api().get("/ncaaa").await.unwrap();
	assert!(resp.status().is_success());
}

#[tokio::test]
async fn forced_logout_is_visible_to_the_manager() {
	let (server, manager) = setup().await;
	mount_csrf_token(&server).await;

	Mock::given(method("POST"))
		.and(path("/login"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"user": {"id": 7, "email": "a@b.com"}})),
		)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/ncaaa"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "expired"})))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/refresh"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "refresh expired"})))
		.mount(&server)
		.await;

	manager.login("a@b.com", "pw").await;
	assert!(manager.state().is_authenticated().await);

	let err = manager.api().get("/ncaaa").await.unwrap_err();
	assert_eq!(err.status(), Some(401));

	// The failed refresh cleared the shared session state.
	assert!(!manager.state().is_authenticated().await);
}

#[tokio::test]
async fn bootstrap_then_logout_round_trip() {
	let (server, manager) = setup().await;
	mount_csrf_token(&server).await;

	Mock::given(method("GET"))
		.and(path("/me"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"user": {"id": 3, "email": "dean@example.edu"}})),
		)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/logout"))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;

	manager.bootstrap().await;
	assert!(!manager.state().is_initializing());
	assert!(manager.state().is_authenticated().await);

	manager.logout().await;
	assert!(!manager.state().is_authenticated().await);
	// Logout does not resurrect the initializing state.
	assert!(!manager.state().is_initializing());
}

#[tokio::test]
async fn concurrent_protected_calls_after_login_share_one_refresh() {
	let (server, manager) = setup().await;
	mount_csrf_token(&server).await;

	Mock::given(method("POST"))
		.and(path("/login"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"user": {"id": 7, "email": "a@b.com"}})),
		)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/ncaaa"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "expired"})))
		.up_to_n_times(4)
		.with_priority(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/ncaaa"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
		.with_priority(10)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/refresh"))
		.respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
		.expect(1)
		.mount(&server)
		.await;

	manager.login("a@b.com", "pw").await;

	let mut handles = Vec::new();
	for _ in 0..4 {
		let api = manager.api().clone();
		handles.push(tokio::spawn(async move { api.get("/ncaaa").await }));
	}
	for handle in handles {
		assert!(handle.await.unwrap().is_ok());
	}

	let refreshes = server
		.received_requests()
		.await
		.unwrap()
		.iter()
		.filter(|r| r.url.path() == "/refresh")
		.count();
	assert_eq!(refreshes, 1);
}

#[tokio::test]
async fn manager_started_auto_refresh_keeps_the_session_warm() {
	let (server, manager) = setup().await;
	mount_csrf_token(&server).await;

	Mock::given(method("POST"))
		.and(path("/login"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"user": {"id": 7, "email": "a@b.com"}})),
		)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/refresh"))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;

	manager.login("a@b.com", "pw").await;

	let mut auto = manager.start_auto_refresh(AutoRefreshConfig {
		interval: Duration::from_millis(50),
	});

	tokio::time::sleep(Duration::from_millis(180)).await;
	auto.stop().await;

	assert!(auto.refreshes_attempted() >= 2);
	let refreshes = server
		.received_requests()
		.await
		.unwrap()
		.iter()
		.filter(|r| r.url.path() == "/refresh")
		.count();
	assert!(refreshes >= 2);
}
