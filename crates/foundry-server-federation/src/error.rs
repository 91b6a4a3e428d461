// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use foundry_server_auth::PasswordError;
use foundry_server_db::DbError;

use crate::provider::ProviderError;

/// Why a federated sign-in failed. Every variant is terminal; nothing in
/// the flow retries.
#[derive(Debug, thiserror::Error)]
pub enum FederationError {
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	#[error("token exchange failed: {0}")]
	TokenExchange(#[source] ProviderError),

	#[error("failed to fetch identity from provider: {0}")]
	ProfileFetch(#[source] ProviderError),

	#[error("provider account has no primary email")]
	NoPrimaryEmail,

	#[error("primary email is not verified with the provider")]
	UnverifiedEmail,

	#[error("directory error: {0}")]
	Directory(#[from] DbError),

	#[error("password hashing failed: {0}")]
	Hashing(#[from] PasswordError),
}

impl FederationError {
	/// Stable code carried on the failure redirect.
	pub fn code(&self) -> &'static str {
		match self {
			FederationError::InvalidRequest(_) => "invalid_request",
			FederationError::TokenExchange(_) => "token_exchange_failed",
			FederationError::ProfileFetch(_) => "profile_fetch_failed",
			FederationError::NoPrimaryEmail => "no_primary_email",
			FederationError::UnverifiedEmail => "unverified_email",
			FederationError::Directory(_) => "directory_error",
			FederationError::Hashing(_) => "hashing_failed",
		}
	}
}

pub type Result<T> = std::result::Result<T, FederationError>;
