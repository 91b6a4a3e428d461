// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth app section.

use foundry_common_secret::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration layer for GitHub OAuth (all fields optional for layering).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfigLayer {
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub client_secret: Option<SecretString>,
	/// Defaults to `{http.base_url}/auth/github/callback`.
	#[serde(default)]
	pub redirect_uri: Option<String>,
	#[serde(default)]
	pub scopes: Option<Vec<String>>,
	/// Endpoint overrides, for GitHub Enterprise.
	#[serde(default)]
	pub authorize_url: Option<String>,
	#[serde(default)]
	pub token_url: Option<String>,
	#[serde(default)]
	pub api_base_url: Option<String>,
}

impl GitHubConfigLayer {
	/// Merge with another layer, preferring values from `other`.
	pub fn merge(&mut self, other: GitHubConfigLayer) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.redirect_uri.is_some() {
			self.redirect_uri = other.redirect_uri;
		}
		if other.scopes.is_some() {
			self.scopes = other.scopes;
		}
		if other.authorize_url.is_some() {
			self.authorize_url = other.authorize_url;
		}
		if other.token_url.is_some() {
			self.token_url = other.token_url;
		}
		if other.api_base_url.is_some() {
			self.api_base_url = other.api_base_url;
		}
	}

	/// Build the final config. Client credentials are mandatory: the server
	/// has no other way to sign anyone in.
	pub fn build(self, base_url: &str) -> Result<GitHubConfig, ConfigError> {
		let client_id = self
			.client_id
			.filter(|s| !s.is_empty())
			.ok_or_else(|| ConfigError::Validation("github.client_id is required".to_string()))?;

		let client_secret = self
			.client_secret
			.filter(|s| !s.expose().is_empty())
			.ok_or_else(|| {
				ConfigError::Validation("github.client_secret is required".to_string())
			})?;

		let redirect_uri = self
			.redirect_uri
			.filter(|s| !s.is_empty())
			.unwrap_or_else(|| format!("{base_url}/auth/github/callback"));

		let scopes = self
			.scopes
			.unwrap_or_else(|| vec!["user:email".to_string(), "read:user".to_string()]);
		if !scopes.iter().any(|s| s == "user:email") {
			return Err(ConfigError::Validation(
				"github.scopes must include user:email".to_string(),
			));
		}

		Ok(GitHubConfig {
			client_id,
			client_secret,
			redirect_uri,
			scopes,
			authorize_url: self.authorize_url,
			token_url: self.token_url,
			api_base_url: self.api_base_url,
		})
	}
}

/// Validated GitHub OAuth configuration. Endpoint fields left `None` mean
/// github.com.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	pub redirect_uri: String,
	pub scopes: Vec<String>,
	pub authorize_url: Option<String>,
	pub token_url: Option<String>,
	pub api_base_url: Option<String>,
}
