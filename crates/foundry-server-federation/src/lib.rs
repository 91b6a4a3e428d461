// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Federated sign-in for Foundry.
//!
//! [`FederatedAuthProvider`] maps an identity provider's primary email to a
//! local account, creating the account (and an organisation for it) on the
//! first sign-in. Around it:
//!
//! - [`provider`]: the provider seam; [`github`] implements it for GitHub.
//! - [`directory`]: the user/organisation storage seam, implemented by the
//!   SQLite repositories.
//! - [`ticket`]: signed one-minute tickets handed to the front end.
//! - [`redirect`]: success/failure redirect URLs.
//! - [`sweep`]: removes organisations a failed or raced sign-in left empty.

pub mod directory;
pub mod error;
pub mod github;
pub mod provider;
pub mod redirect;
pub mod service;
pub mod sweep;
pub mod ticket;

pub use directory::{OrganisationDirectory, UserDirectory};
pub use error::FederationError;
pub use github::GitHubIdentityProvider;
pub use provider::{
	AccessToken, IdentityProvider, ProviderEmail, ProviderError, ProviderProfile, ProviderSession,
};
pub use redirect::{RedirectConfigError, RedirectTargets};
pub use service::{select_primary_email, FederatedAuthProvider, FederationOptions, NA_NAME};
pub use sweep::{OrphanSweeper, DEFAULT_ORPHAN_GRACE, DEFAULT_SWEEP_INTERVAL};
pub use ticket::{TicketError, TicketSigner, DEFAULT_TICKET_TTL};
