// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! [`IdentityProvider`] over the GitHub OAuth client.

use std::sync::Arc;

use async_trait::async_trait;
use foundry_server_auth_github::{GitHubEmail, GitHubOAuthClient, GitHubUser, OAuthError};

use crate::provider::{
	AccessToken, IdentityProvider, ProviderEmail, ProviderError, ProviderProfile, ProviderSession,
};

impl From<OAuthError> for ProviderError {
	fn from(err: OAuthError) -> Self {
		match err {
			OAuthError::HttpRequest(e) => ProviderError::Transport(e.to_string()),
			OAuthError::GitHubError(message) => ProviderError::Rejected(message),
			OAuthError::ParseError(message) => ProviderError::Malformed(message),
		}
	}
}

impl From<GitHubEmail> for ProviderEmail {
	fn from(email: GitHubEmail) -> Self {
		ProviderEmail {
			address: email.email,
			is_primary: email.primary,
			is_verified: Some(email.verified),
		}
	}
}

impl From<GitHubUser> for ProviderProfile {
	fn from(user: GitHubUser) -> Self {
		ProviderProfile {
			login: user.login.filter(|l| !l.is_empty()),
			id: user.id.to_string(),
		}
	}
}

#[derive(Clone)]
pub struct GitHubIdentityProvider {
	client: Arc<GitHubOAuthClient>,
}

impl GitHubIdentityProvider {
	pub fn new(client: Arc<GitHubOAuthClient>) -> Self {
		Self { client }
	}
}

#[async_trait]
impl IdentityProvider for GitHubIdentityProvider {
	fn name(&self) -> &'static str {
		"github"
	}

	async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError> {
		let response = self.client.exchange_code(code).await?;
		Ok(AccessToken::new(response.access_token))
	}

	fn session(&self, token: AccessToken) -> Box<dyn ProviderSession> {
		Box::new(GitHubSession {
			client: Arc::clone(&self.client),
			token,
		})
	}
}

struct GitHubSession {
	client: Arc<GitHubOAuthClient>,
	token: AccessToken,
}

#[async_trait]
impl ProviderSession for GitHubSession {
	async fn list_emails(&self) -> Result<Vec<ProviderEmail>, ProviderError> {
		let emails = self.client.get_emails(self.token.expose()).await?;
		Ok(emails.into_iter().map(ProviderEmail::from).collect())
	}

	async fn get_profile(&self) -> Result<ProviderProfile, ProviderError> {
		let user = self.client.get_user(self.token.expose()).await?;
		Ok(user.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use foundry_common_secret::SecretString;
	use foundry_server_auth_github::{GitHubEndpoints, GitHubOAuthConfig};
	use wiremock::matchers::{header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn provider_for(server: &MockServer) -> GitHubIdentityProvider {
		let config = GitHubOAuthConfig {
			client_id: "cid".to_string(),
			client_secret: SecretString::new("csecret".to_string()),
			redirect_uri: "https://foundry.test/auth/github/callback".to_string(),
			scopes: GitHubOAuthConfig::default_scopes(),
			endpoints: GitHubEndpoints::from_base(&server.uri()),
		};
		GitHubIdentityProvider::new(Arc::new(GitHubOAuthClient::new(config).unwrap()))
	}

	#[test]
	fn empty_login_becomes_none() {
		let profile: ProviderProfile = GitHubUser {
			id: 1,
			login: Some(String::new()),
			name: None,
			email: None,
			avatar_url: None,
		}
		.into();
		assert_eq!(profile.login, None);
		assert_eq!(profile.id, "1");
	}

	#[test]
	fn github_emails_always_carry_verification() {
		let email: ProviderEmail = GitHubEmail {
			email: "a@x".to_string(),
			primary: true,
			verified: false,
		}
		.into();
		assert_eq!(email.is_verified, Some(false));
	}

	#[tokio::test]
	async fn session_uses_exchanged_token() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/login/oauth/access_token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"access_token": "gho_abc",
				"token_type": "bearer"
			})))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/user/emails"))
			.and(header("Authorization", "Bearer gho_abc"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
				{"email": "x@y.com", "primary": true, "verified": true}
			])))
			.expect(1)
			.mount(&server)
			.await;

		let provider = provider_for(&server);
		let token = provider.exchange_code("abc123").await.unwrap();
		let emails = provider.session(token).list_emails().await.unwrap();

		assert_eq!(
			emails,
			vec![ProviderEmail {
				address: "x@y.com".to_string(),
				is_primary: true,
				is_verified: Some(true),
			}]
		);
	}

	#[tokio::test]
	async fn rejected_code_maps_to_rejected() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/login/oauth/access_token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"error": "bad_verification_code"
			})))
			.mount(&server)
			.await;

		let err = provider_for(&server).exchange_code("bad").await.unwrap_err();
		assert!(matches!(err, ProviderError::Rejected(_)));
	}
}
