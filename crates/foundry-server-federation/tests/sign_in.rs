// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end sign-in against a mocked GitHub and an in-memory database.

use std::sync::Arc;
use std::time::Duration;

use foundry_common_secret::SecretString;
use foundry_server_auth::{NewOrganization, NewUser};
use foundry_server_auth_github::{GitHubEndpoints, GitHubOAuthClient, GitHubOAuthConfig};
use foundry_server_db::testing::create_migrated_test_pool;
use foundry_server_db::{OrgRepository, UserRepository};
use foundry_server_federation::{
	FederatedAuthProvider, FederationError, FederationOptions, GitHubIdentityProvider,
	OrganisationDirectory, OrphanSweeper,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct World {
	github: MockServer,
	users: UserRepository,
	orgs: OrgRepository,
	service: FederatedAuthProvider,
}

async fn world() -> World {
	let github = MockServer::start().await;
	let config = GitHubOAuthConfig {
		client_id: "cid".to_string(),
		client_secret: SecretString::new("csecret".to_string()),
		redirect_uri: "https://foundry.test/auth/github/callback".to_string(),
		scopes: GitHubOAuthConfig::default_scopes(),
		endpoints: GitHubEndpoints::from_base(&github.uri()),
	};
	let client = Arc::new(GitHubOAuthClient::new(config).unwrap());

	let pool = create_migrated_test_pool().await;
	let users = UserRepository::new(pool.clone());
	let orgs = OrgRepository::new(pool);

	let service = FederatedAuthProvider::new(
		Arc::new(GitHubIdentityProvider::new(client)),
		Arc::new(users.clone()),
		Arc::new(orgs.clone()),
		FederationOptions::default(),
	);

	World {
		github,
		users,
		orgs,
		service,
	}
}

async fn mock_github(server: &MockServer, code: &str, emails: serde_json::Value, login: Option<&str>) {
	let token = format!("gho_{code}");
	Mock::given(method("POST"))
		.and(path("/login/oauth/access_token"))
		.and(body_string_contains(format!("code={code}")))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"access_token": token,
			"token_type": "bearer",
			"scope": "user:email"
		})))
		.mount(server)
		.await;
	Mock::given(method("GET"))
		.and(path("/user/emails"))
		.respond_with(ResponseTemplate::new(200).set_body_json(emails))
		.mount(server)
		.await;
	Mock::given(method("GET"))
		.and(path("/user"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"id": 9001,
			"login": login,
		})))
		.mount(server)
		.await;
}

async fn orphan_count(orgs: &OrgRepository) -> usize {
	orgs.list_orphaned_orgs(Duration::ZERO).await.unwrap().len()
}

#[tokio::test]
async fn returning_user_signs_in_without_provisioning() {
	let w = world().await;
	let org = w
		.orgs
		.create_org(NewOrganization {
			name: "calm-cedar-0001".to_string(),
		})
		.await
		.unwrap();
	let existing = w
		.users
		.create_user(NewUser {
			name: "existing".to_string(),
			email: "x@y.com".to_string(),
			org_id: org.id,
			password_hash: "$argon2id$stub".to_string(),
		})
		.await
		.unwrap();
	mock_github(
		&w.github,
		"abc123",
		serde_json::json!([{"email": "x@y.com", "primary": true, "verified": true}]),
		Some("existing"),
	)
	.await;

	let user = w.service.authenticate("abc123").await.unwrap();

	assert_eq!(user.id, existing.id);
	assert_eq!(w.users.count_users_in_org(&org.id).await.unwrap(), 1);
	let profile_calls = w
		.github
		.received_requests()
		.await
		.unwrap()
		.iter()
		.filter(|r| r.url.path() == "/user")
		.count();
	assert_eq!(profile_calls, 0);
}

#[tokio::test]
async fn first_sign_in_provisions_org_and_user() {
	let w = world().await;
	mock_github(
		&w.github,
		"def456",
		serde_json::json!([
			{"email": "old@y.com", "primary": false, "verified": true},
			{"email": "new@y.com", "primary": true, "verified": true}
		]),
		Some("newdev"),
	)
	.await;

	let user = w.service.authenticate("def456").await.unwrap();

	assert_eq!(user.email, "new@y.com");
	assert_eq!(user.name, "newdev");
	let org = w.orgs.get_org_by_id(&user.org_id).await.unwrap().unwrap();
	assert_eq!(org.name.split('-').count(), 3);

	let stored = w.users.get_user_by_email("new@y.com").await.unwrap().unwrap();
	assert_eq!(stored.id, user.id);
	assert!(stored.password_hash.starts_with("$argon2id$"));

	let again = w.service.authenticate("def456").await.unwrap();
	assert_eq!(again.id, user.id);
}

#[tokio::test]
async fn concurrent_first_sign_ins_yield_one_user() {
	let w = world().await;
	mock_github(
		&w.github,
		"race",
		serde_json::json!([{"email": "race@y.com", "primary": true, "verified": true}]),
		None,
	)
	.await;

	let (a, b) = tokio::join!(w.service.authenticate("race"), w.service.authenticate("race"));
	let (a, b) = (a.unwrap(), b.unwrap());

	assert_eq!(a.id, b.id);
	assert_eq!(a.name, "N/A");
	assert_eq!(w.users.count_users_in_org(&a.org_id).await.unwrap(), 1);

	// A losing request leaves an empty organisation behind; the sweep
	// clears it and keeps the winner's.
	let sweeper = OrphanSweeper::new(Arc::new(w.orgs.clone()), Duration::ZERO);
	sweeper.run_once().await.unwrap();
	assert_eq!(orphan_count(&w.orgs).await, 0);
	assert!(w.orgs.get_org_by_id(&a.org_id).await.unwrap().is_some());
}

#[tokio::test]
async fn rejected_code_creates_nothing() {
	let w = world().await;
	Mock::given(method("POST"))
		.and(path("/login/oauth/access_token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"error": "bad_verification_code",
			"error_description": "The code passed is incorrect or expired."
		})))
		.mount(&w.github)
		.await;

	let err = w.service.authenticate("stale").await.unwrap_err();

	assert!(matches!(err, FederationError::TokenExchange(_)));
	assert_eq!(err.code(), "token_exchange_failed");
	assert_eq!(w.github.received_requests().await.unwrap().len(), 1);
	assert_eq!(
		w.orgs
			.remove_orphaned_organisations(Duration::ZERO)
			.await
			.unwrap(),
		0
	);
}

#[tokio::test]
async fn unverified_primary_is_refused() {
	let w = world().await;
	mock_github(
		&w.github,
		"unverified",
		serde_json::json!([{"email": "u@y.com", "primary": true, "verified": false}]),
		Some("u"),
	)
	.await;

	let err = w.service.authenticate("unverified").await.unwrap_err();
	assert_eq!(err.code(), "unverified_email");
	assert!(w.users.get_user_by_email("u@y.com").await.unwrap().is_none());
}
