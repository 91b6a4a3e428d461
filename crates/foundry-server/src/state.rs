// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared handler state.

use std::sync::Arc;

use foundry_server_auth_github::{GitHubEndpoints, GitHubOAuthClient, GitHubOAuthConfig};
use foundry_server_config::{GitHubConfig, ServerConfig};
use foundry_server_db::{OrgRepository, UserRepository};
use foundry_server_federation::{
	FederatedAuthProvider, FederationOptions, GitHubIdentityProvider, OrphanSweeper,
	RedirectTargets, TicketSigner,
};
use sqlx::SqlitePool;

use crate::error::ServerError;
use crate::oauth_state::OAuthStateStore;

#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub github_oauth: Arc<GitHubOAuthClient>,
	pub federation: Arc<FederatedAuthProvider>,
	pub oauth_state_store: OAuthStateStore,
	pub ticket_signer: TicketSigner,
	pub redirects: RedirectTargets,
}

impl AppState {
	/// Wire the sign-in flow over the SQLite repositories.
	pub fn new(
		pool: SqlitePool,
		github_oauth: Arc<GitHubOAuthClient>,
		options: FederationOptions,
		ticket_signer: TicketSigner,
		redirects: RedirectTargets,
	) -> Self {
		let federation = FederatedAuthProvider::new(
			Arc::new(GitHubIdentityProvider::new(Arc::clone(&github_oauth))),
			Arc::new(UserRepository::new(pool.clone())),
			Arc::new(OrgRepository::new(pool.clone())),
			options,
		);
		Self {
			pool,
			github_oauth,
			federation: Arc::new(federation),
			oauth_state_store: OAuthStateStore::new(),
			ticket_signer,
			redirects,
		}
	}

	pub fn from_config(pool: SqlitePool, config: &ServerConfig) -> Result<Self, ServerError> {
		let github_config = github_oauth_config(&config.github);
		github_config.validate()?;
		let github_oauth = Arc::new(GitHubOAuthClient::new(github_config)?);

		let redirects =
			RedirectTargets::new(&config.frontend.success_url, &config.frontend.failure_url)?;
		let ticket_signer = TicketSigner::new(
			config.federation.ticket_secret.clone(),
			config.federation.ticket_ttl,
		);
		let options = FederationOptions {
			require_verified_email: config.federation.require_verified_email,
		};

		Ok(Self::new(pool, github_oauth, options, ticket_signer, redirects))
	}

	pub fn orphan_sweeper(&self, config: &ServerConfig) -> OrphanSweeper {
		OrphanSweeper::new(
			Arc::new(OrgRepository::new(self.pool.clone())),
			config.federation.orphan_grace,
		)
	}
}

fn github_oauth_config(config: &GitHubConfig) -> GitHubOAuthConfig {
	let defaults = GitHubEndpoints::default();
	GitHubOAuthConfig {
		client_id: config.client_id.clone(),
		client_secret: config.client_secret.clone(),
		redirect_uri: config.redirect_uri.clone(),
		scopes: config.scopes.clone(),
		endpoints: GitHubEndpoints {
			authorize_url: config
				.authorize_url
				.clone()
				.unwrap_or(defaults.authorize_url),
			token_url: config.token_url.clone().unwrap_or(defaults.token_url),
			api_base_url: config.api_base_url.clone().unwrap_or(defaults.api_base_url),
		},
	}
}
