// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth 2.0 client for Foundry sign-in.
//!
//! Covers the provider side of the authorization code flow:
//!
//! 1. [`GitHubOAuthClient::authorization_url`] builds the consent URL the
//!    browser is sent to.
//! 2. GitHub redirects back to `redirect_uri` with `code` (and `state`).
//! 3. [`GitHubOAuthClient::exchange_code`] trades the code for an access token.
//! 4. [`GitHubOAuthClient::get_emails`] and [`GitHubOAuthClient::get_user`]
//!    read the caller's addresses and profile with that token.
//!
//! Nothing here decides who the caller is locally; that is the federation
//! layer's job.
//!
//! # Security
//!
//! - `client_secret` and access tokens are [`SecretString`]s and never appear
//!   in `Debug` output or logs.
//! - Every instrumented method skips the code and the token.

use foundry_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

const GITHUB_API_VERSION: &str = "2022-11-28";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Errors from talking to GitHub.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
	/// Transport failure: DNS, connect, TLS, timeout.
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	/// GitHub answered but not in the shape we expect.
	#[error("failed to parse response: {0}")]
	ParseError(String),

	/// GitHub rejected the request: bad or expired code, mismatched
	/// redirect URI, revoked token, missing scope.
	#[error("GitHub API error: {0}")]
	GitHubError(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Where the OAuth and REST endpoints live. Defaults to github.com; GitHub
/// Enterprise hosts and tests point these elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubEndpoints {
	pub authorize_url: String,
	pub token_url: String,
	pub api_base_url: String,
}

impl Default for GitHubEndpoints {
	fn default() -> Self {
		Self {
			authorize_url: GITHUB_AUTHORIZE_URL.to_string(),
			token_url: GITHUB_TOKEN_URL.to_string(),
			api_base_url: GITHUB_API_BASE_URL.to_string(),
		}
	}
}

impl GitHubEndpoints {
	/// Endpoints for a host that serves both the OAuth pages and the REST
	/// API under one base URL (the layout `wiremock` tests use).
	pub fn from_base(base: &str) -> Self {
		let base = base.trim_end_matches('/');
		Self {
			authorize_url: format!("{base}/login/oauth/authorize"),
			token_url: format!("{base}/login/oauth/access_token"),
			api_base_url: base.to_string(),
		}
	}

	fn api(&self, path: &str) -> String {
		format!("{}{path}", self.api_base_url.trim_end_matches('/'))
	}
}

/// Credentials and settings for the GitHub OAuth app.
#[derive(Debug, Clone)]
pub struct GitHubOAuthConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	/// Callback URL registered with the OAuth app.
	pub redirect_uri: String,
	/// Must include `user:email`, otherwise `/user/emails` returns 404.
	pub scopes: Vec<String>,
	pub endpoints: GitHubEndpoints,
}

impl GitHubOAuthConfig {
	pub fn default_scopes() -> Vec<String> {
		vec!["user:email".to_string(), "read:user".to_string()]
	}

	/// Reject empty credentials before any request is made.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"client_id cannot be empty".to_string(),
			));
		}
		if self.client_secret.expose().is_empty() {
			return Err(ConfigError::InvalidConfig(
				"client_secret cannot be empty".to_string(),
			));
		}
		if self.redirect_uri.is_empty() {
			return Err(ConfigError::InvalidConfig(
				"redirect_uri cannot be empty".to_string(),
			));
		}
		if !self.scopes.iter().any(|s| s == "user:email") {
			return Err(ConfigError::InvalidConfig(
				"scopes must include user:email".to_string(),
			));
		}
		Ok(())
	}

	pub fn scopes_string(&self) -> String {
		self.scopes.join(" ")
	}

	/// Split a scope string on spaces and commas (GitHub echoes either).
	pub fn parse_scopes(scope_str: &str) -> Vec<String> {
		scope_str
			.split([' ', ','])
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect()
	}
}

// =============================================================================
// Response types
// =============================================================================

/// Successful token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTokenResponse {
	pub access_token: SecretString,
	pub token_type: String,
	/// Granted scopes, comma separated. May be narrower than requested.
	#[serde(default)]
	pub scope: String,
}

/// `GET /user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
	/// Stable numeric id; survives username changes.
	pub id: i64,
	/// Handle. Absent for some app-installation and ghost accounts.
	#[serde(default)]
	pub login: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	/// Public email only; use `/user/emails` for the full list.
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub avatar_url: Option<String>,
}

/// One entry of `GET /user/emails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubEmail {
	pub email: String,
	pub primary: bool,
	pub verified: bool,
}

/// GitHub answers a rejected code exchange with HTTP 200 and this body.
#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
	error: String,
	error_description: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct GitHubOAuthClient {
	config: GitHubOAuthConfig,
	http_client: reqwest::Client,
}

impl GitHubOAuthClient {
	/// # Errors
	/// Fails only if the HTTP client cannot be constructed.
	#[tracing::instrument(skip_all, name = "GitHubOAuthClient::new")]
	pub fn new(config: GitHubOAuthConfig) -> Result<Self, OAuthError> {
		let http_client = foundry_common_http::new_client()?;
		Ok(Self::with_http_client(config, http_client))
	}

	pub fn with_http_client(config: GitHubOAuthConfig, http_client: reqwest::Client) -> Self {
		Self {
			config,
			http_client,
		}
	}

	pub fn config(&self) -> &GitHubOAuthConfig {
		&self.config
	}

	/// Build the consent URL. `state` must be unguessable and checked on
	/// the callback.
	///
	/// # Errors
	/// Returns [`ConfigError::InvalidConfig`] if the configured authorize URL
	/// does not parse.
	#[tracing::instrument(skip(self, state), fields(client_id = %self.config.client_id))]
	pub fn authorization_url(&self, state: &str) -> Result<String, ConfigError> {
		let mut url = Url::parse(&self.config.endpoints.authorize_url)
			.map_err(|e| ConfigError::InvalidConfig(format!("invalid authorize URL: {e}")))?;

		url
			.query_pairs_mut()
			.append_pair("client_id", &self.config.client_id)
			.append_pair("redirect_uri", &self.config.redirect_uri)
			.append_pair("scope", &self.config.scopes_string())
			.append_pair("state", state);

		Ok(url.to_string())
	}

	/// Exchange an authorization code for an access token.
	///
	/// Codes are single use. There is no retry here: a second attempt with
	/// the same code is always rejected by GitHub.
	///
	/// # Errors
	/// - [`OAuthError::HttpRequest`]: transport failure.
	/// - [`OAuthError::GitHubError`]: code rejected (expired, reused,
	///   redirect mismatch, bad client credentials).
	/// - [`OAuthError::ParseError`]: unexpected body.
	#[tracing::instrument(skip(self, code), name = "GitHubOAuthClient::exchange_code")]
	pub async fn exchange_code(&self, code: &str) -> Result<GitHubTokenResponse, OAuthError> {
		tracing::debug!("exchanging authorization code for access token");

		let response = self
			.http_client
			.post(&self.config.endpoints.token_url)
			.header("Accept", "application/json")
			.form(&[
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.expose().as_str()),
				("code", code),
				("redirect_uri", self.config.redirect_uri.as_str()),
				("grant_type", "authorization_code"),
			])
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if let Ok(error_response) = serde_json::from_str::<GitHubErrorResponse>(&body) {
			if !error_response.error.is_empty() {
				let message = error_response
					.error_description
					.unwrap_or(error_response.error);
				return Err(OAuthError::GitHubError(message));
			}
		}

		if !status.is_success() {
			return Err(OAuthError::GitHubError(format!(
				"token endpoint returned {status}"
			)));
		}

		serde_json::from_str(&body)
			.map_err(|e| OAuthError::ParseError(format!("failed to parse token response: {e}")))
	}

	/// `GET /user` for the token's owner.
	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::get_user")]
	pub async fn get_user(&self, access_token: &str) -> Result<GitHubUser, OAuthError> {
		tracing::debug!("fetching GitHub user profile");
		self.get_json("/user", access_token, "user").await
	}

	/// `GET /user/emails`: every address on the account, private ones
	/// included, each flagged primary/verified.
	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::get_emails")]
	pub async fn get_emails(&self, access_token: &str) -> Result<Vec<GitHubEmail>, OAuthError> {
		tracing::debug!("fetching GitHub user emails");
		self.get_json("/user/emails", access_token, "emails").await
	}

	async fn get_json<T>(&self, path: &str, access_token: &str, what: &str) -> Result<T, OAuthError>
	where
		T: serde::de::DeserializeOwned,
	{
		let response = self
			.http_client
			.get(self.config.endpoints.api(path))
			.header("Accept", "application/vnd.github+json")
			.header("Authorization", format!("Bearer {access_token}"))
			.header("X-GitHub-Api-Version", GITHUB_API_VERSION)
			.send()
			.await?;

		if !response.status().is_success() {
			let status = response.status();
			let body = response.text().await.unwrap_or_default();
			return Err(OAuthError::GitHubError(format!(
				"failed to get {what} ({status}): {body}"
			)));
		}

		response
			.json()
			.await
			.map_err(|e| OAuthError::ParseError(format!("failed to parse {what} response: {e}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{body_string_contains, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn test_config(endpoints: GitHubEndpoints) -> GitHubOAuthConfig {
		GitHubOAuthConfig {
			client_id: "test_client_id".to_string(),
			client_secret: SecretString::new("test_secret".to_string()),
			redirect_uri: "https://example.com/callback".to_string(),
			scopes: GitHubOAuthConfig::default_scopes(),
			endpoints,
		}
	}

	fn mock_client(server: &MockServer) -> GitHubOAuthClient {
		GitHubOAuthClient::new(test_config(GitHubEndpoints::from_base(&server.uri()))).unwrap()
	}

	#[test]
	fn authorization_url_contains_required_params() {
		let client = GitHubOAuthClient::new(test_config(GitHubEndpoints::default())).unwrap();
		let url = client.authorization_url("test_state_123").unwrap();

		assert!(url.starts_with(GITHUB_AUTHORIZE_URL));
		assert!(url.contains("client_id=test_client_id"));
		assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fcallback"));
		assert!(url.contains("state=test_state_123"));
		assert!(url.contains("scope=user%3Aemail+read%3Auser"));
	}

	#[test]
	fn validation_rejects_empty_fields_and_missing_email_scope() {
		let mut config = test_config(GitHubEndpoints::default());
		assert!(config.validate().is_ok());

		config.client_id = String::new();
		assert!(config.validate().is_err());

		let mut config = test_config(GitHubEndpoints::default());
		config.client_secret = SecretString::new(String::new());
		assert!(config.validate().is_err());

		let mut config = test_config(GitHubEndpoints::default());
		config.redirect_uri = String::new();
		assert!(config.validate().is_err());

		let mut config = test_config(GitHubEndpoints::default());
		config.scopes = vec!["read:user".to_string()];
		assert!(config.validate().is_err());
	}

	#[test]
	fn parse_scopes_handles_commas_and_spaces() {
		assert_eq!(
			GitHubOAuthConfig::parse_scopes("  user:email  ,  read:user  "),
			vec!["user:email", "read:user"]
		);
		assert!(GitHubOAuthConfig::parse_scopes("   ").is_empty());
	}

	#[test]
	fn user_without_login_deserializes() {
		let user: GitHubUser = serde_json::from_str(r#"{"id": 7, "name": null}"#).unwrap();
		assert_eq!(user.id, 7);
		assert!(user.login.is_none());
	}

	#[test]
	fn secrets_are_not_in_debug_output() {
		let config = test_config(GitHubEndpoints::default());
		assert!(!format!("{config:?}").contains("test_secret"));

		let token: GitHubTokenResponse = serde_json::from_str(
			r#"{"access_token": "gho_supersecret", "token_type": "bearer", "scope": "user:email"}"#,
		)
		.unwrap();
		assert!(!format!("{token:?}").contains("gho_supersecret"));
	}

	#[tokio::test]
	async fn exchange_code_posts_form_and_parses_token() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/login/oauth/access_token"))
			.and(body_string_contains("code=abc123"))
			.and(body_string_contains("grant_type=authorization_code"))
			.and(body_string_contains("client_id=test_client_id"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"access_token": "gho_token",
				"token_type": "bearer",
				"scope": "user:email,read:user"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let token = mock_client(&server).exchange_code("abc123").await.unwrap();
		assert_eq!(token.access_token.expose(), "gho_token");
		assert_eq!(token.token_type, "bearer");
	}

	#[tokio::test]
	async fn exchange_code_surfaces_error_body_on_200() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/login/oauth/access_token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"error": "bad_verification_code",
				"error_description": "The code passed is incorrect or expired."
			})))
			.mount(&server)
			.await;

		let err = mock_client(&server).exchange_code("stale").await.unwrap_err();
		match err {
			OAuthError::GitHubError(message) => assert!(message.contains("incorrect or expired")),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn exchange_code_rejects_non_success_status() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/login/oauth/access_token"))
			.respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
			.mount(&server)
			.await;

		let err = mock_client(&server).exchange_code("abc").await.unwrap_err();
		assert!(matches!(err, OAuthError::GitHubError(_)));
	}

	#[tokio::test]
	async fn get_emails_sends_bearer_token() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/user/emails"))
			.and(header("Authorization", "Bearer gho_token"))
			.and(header("X-GitHub-Api-Version", GITHUB_API_VERSION))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
				{"email": "a@x", "primary": false, "verified": true},
				{"email": "b@x", "primary": true, "verified": true}
			])))
			.expect(1)
			.mount(&server)
			.await;

		let emails = mock_client(&server).get_emails("gho_token").await.unwrap();
		assert_eq!(emails.len(), 2);
		assert_eq!(emails[1].email, "b@x");
		assert!(emails[1].primary);
	}

	#[tokio::test]
	async fn get_user_maps_unauthorized_to_github_error() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/user"))
			.respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
			.mount(&server)
			.await;

		let err = mock_client(&server).get_user("revoked").await.unwrap_err();
		match err {
			OAuthError::GitHubError(message) => assert!(message.contains("Bad credentials")),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn get_user_parses_profile() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/user"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"id": 12345,
				"login": "newdev",
				"name": null,
				"email": null,
				"avatar_url": null
			})))
			.mount(&server)
			.await;

		let user = mock_client(&server).get_user("gho_token").await.unwrap();
		assert_eq!(user.id, 12345);
		assert_eq!(user.login.as_deref(), Some("newdev"));
	}
}
