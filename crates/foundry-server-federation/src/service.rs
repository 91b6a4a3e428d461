// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-in orchestration: authorization code in, local user out.
//!
//! ```text
//! code ─▶ exchange ─▶ list emails ─▶ pick primary ─▶ lookup by email
//!                                                     │
//!                          found ◀────────────────────┤
//!                                                     ▼ not found
//!                     profile ─▶ create org ─▶ hash password ─▶ create user
//! ```
//!
//! A failure after the organisation is created leaves it without users; the
//! orphan sweep removes it later.

use std::sync::Arc;

use foundry_server_auth::{NewOrganization, NewUser, User};

use crate::directory::{OrganisationDirectory, UserDirectory};
use crate::error::{FederationError, Result};
use crate::provider::{IdentityProvider, ProviderEmail, ProviderSession};

/// Name given to accounts whose provider profile has no handle.
pub const NA_NAME: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FederationOptions {
	/// Refuse a primary email the provider reports as unverified.
	pub require_verified_email: bool,
}

impl Default for FederationOptions {
	fn default() -> Self {
		Self {
			require_verified_email: true,
		}
	}
}

/// The first address flagged primary, if any.
pub fn select_primary_email(emails: &[ProviderEmail]) -> Option<&ProviderEmail> {
	emails.iter().find(|e| e.is_primary)
}

pub struct FederatedAuthProvider {
	provider: Arc<dyn IdentityProvider>,
	users: Arc<dyn UserDirectory>,
	orgs: Arc<dyn OrganisationDirectory>,
	options: FederationOptions,
}

impl FederatedAuthProvider {
	pub fn new(
		provider: Arc<dyn IdentityProvider>,
		users: Arc<dyn UserDirectory>,
		orgs: Arc<dyn OrganisationDirectory>,
		options: FederationOptions,
	) -> Self {
		Self {
			provider,
			users,
			orgs,
			options,
		}
	}

	/// Resolve an authorization code to a local user, creating the user and
	/// a fresh organisation on first sign-in.
	///
	/// # Errors
	/// See [`FederationError`]. "No such user" is not an error; it is the
	/// provisioning branch.
	#[tracing::instrument(skip(self, code), fields(provider = self.provider.name()))]
	pub async fn authenticate(&self, code: &str) -> Result<User> {
		if code.trim().is_empty() {
			return Err(FederationError::InvalidRequest(
				"missing authorization code".to_string(),
			));
		}

		let token = self
			.provider
			.exchange_code(code)
			.await
			.map_err(FederationError::TokenExchange)?;
		let session = self.provider.session(token);

		let emails = session
			.list_emails()
			.await
			.map_err(FederationError::ProfileFetch)?;
		let primary = select_primary_email(&emails).ok_or(FederationError::NoPrimaryEmail)?;
		if self.options.require_verified_email && primary.is_verified == Some(false) {
			return Err(FederationError::UnverifiedEmail);
		}
		let email = primary.address.clone();

		if let Some(user) = self.users.get_user_by_email(&email).await? {
			tracing::info!(user_id = %user.id, "federated sign-in matched existing user");
			return Ok(user);
		}

		self.provision(session.as_ref(), email).await
	}

	async fn provision(&self, session: &dyn ProviderSession, email: String) -> Result<User> {
		let profile = session
			.get_profile()
			.await
			.map_err(FederationError::ProfileFetch)?;
		let name = profile.login.unwrap_or_else(|| NA_NAME.to_string());

		let org_name = self.orgs.create_organisation_name().await?;
		let org = self
			.orgs
			.create_organisation(NewOrganization { name: org_name })
			.await?;
		tracing::debug!(org_id = %org.id, "organization provisioned");

		let password = self.users.create_password();
		let password_hash = self.users.hash_user_password(password).await?;

		let new_user = NewUser {
			name,
			email,
			org_id: org.id,
			password_hash,
		};
		match self.users.create_user(new_user.clone()).await {
			Ok(user) => {
				tracing::info!(user_id = %user.id, org_id = %org.id, "federated sign-in provisioned new user");
				Ok(user)
			}
			Err(err) if err.is_conflict() => {
				tracing::info!(org_id = %org.id, "lost concurrent provisioning race; using existing user");
				self
					.users
					.get_user_by_email(&new_user.email)
					.await?
					.ok_or(FederationError::Directory(err))
			}
			Err(err) => Err(err.into()),
		}
	}
}
