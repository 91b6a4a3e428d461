// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The identity provider seam.
//!
//! An [`IdentityProvider`] turns an authorization code into an
//! [`AccessToken`], and hands out a [`ProviderSession`] bound to that token
//! for reading the caller's emails and profile.

use async_trait::async_trait;
use foundry_common_secret::SecretString;

/// Bearer credential from the code exchange. Lives for one sign-in only.
#[derive(Clone, Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
	pub fn new(token: SecretString) -> Self {
		Self(token)
	}

	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}

/// One address on the provider account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEmail {
	pub address: String,
	pub is_primary: bool,
	/// `None` when the provider does not say.
	pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
	/// Display handle; absent for some accounts.
	pub login: Option<String>,
	/// Provider-assigned stable id.
	pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
	#[error("transport error: {0}")]
	Transport(String),

	#[error("rejected by provider: {0}")]
	Rejected(String),

	#[error("malformed provider response: {0}")]
	Malformed(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Short lowercase name used in logs, e.g. `github`.
	fn name(&self) -> &'static str;

	async fn exchange_code(&self, code: &str) -> Result<AccessToken, ProviderError>;

	fn session(&self, token: AccessToken) -> Box<dyn ProviderSession>;
}

#[async_trait]
pub trait ProviderSession: Send + Sync {
	async fn list_emails(&self) -> Result<Vec<ProviderEmail>, ProviderError>;

	async fn get_profile(&self) -> Result<ProviderProfile, ProviderError>;
}
