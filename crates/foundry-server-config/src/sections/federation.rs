// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-in policy, login tickets, and the orphan sweep.

use std::time::Duration;

use foundry_common_secret::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_TICKET_TTL_SECS: u64 = 60;
const DEFAULT_ORPHAN_SWEEP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_ORPHAN_GRACE_SECS: u64 = 900;
const MIN_TICKET_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct FederationConfig {
	pub require_verified_email: bool,
	/// HMAC key for login tickets.
	pub ticket_secret: SecretString,
	pub ticket_ttl: Duration,
	pub orphan_sweep_interval: Duration,
	/// Empty organisations younger than this are left alone.
	pub orphan_grace: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FederationConfigLayer {
	#[serde(default)]
	pub require_verified_email: Option<bool>,
	#[serde(default)]
	pub ticket_secret: Option<SecretString>,
	#[serde(default)]
	pub ticket_ttl_secs: Option<u64>,
	#[serde(default)]
	pub orphan_sweep_interval_secs: Option<u64>,
	#[serde(default)]
	pub orphan_grace_secs: Option<u64>,
}

impl FederationConfigLayer {
	pub fn merge(&mut self, other: FederationConfigLayer) {
		if other.require_verified_email.is_some() {
			self.require_verified_email = other.require_verified_email;
		}
		if other.ticket_secret.is_some() {
			self.ticket_secret = other.ticket_secret;
		}
		if other.ticket_ttl_secs.is_some() {
			self.ticket_ttl_secs = other.ticket_ttl_secs;
		}
		if other.orphan_sweep_interval_secs.is_some() {
			self.orphan_sweep_interval_secs = other.orphan_sweep_interval_secs;
		}
		if other.orphan_grace_secs.is_some() {
			self.orphan_grace_secs = other.orphan_grace_secs;
		}
	}

	pub fn finalize(self) -> Result<FederationConfig, ConfigError> {
		let ticket_secret = self.ticket_secret.ok_or_else(|| {
			ConfigError::Validation("federation.ticket_secret is required".to_string())
		})?;
		if ticket_secret.expose().len() < MIN_TICKET_SECRET_LEN {
			return Err(ConfigError::InvalidValue {
				key: "federation.ticket_secret".to_string(),
				message: format!("must be at least {MIN_TICKET_SECRET_LEN} bytes"),
			});
		}

		let ticket_ttl_secs = positive(
			"federation.ticket_ttl_secs",
			self.ticket_ttl_secs.unwrap_or(DEFAULT_TICKET_TTL_SECS),
		)?;
		let interval_secs = positive(
			"federation.orphan_sweep_interval_secs",
			self
				.orphan_sweep_interval_secs
				.unwrap_or(DEFAULT_ORPHAN_SWEEP_INTERVAL_SECS),
		)?;

		Ok(FederationConfig {
			require_verified_email: self.require_verified_email.unwrap_or(true),
			ticket_secret,
			ticket_ttl: Duration::from_secs(ticket_ttl_secs),
			orphan_sweep_interval: Duration::from_secs(interval_secs),
			orphan_grace: Duration::from_secs(
				self.orphan_grace_secs.unwrap_or(DEFAULT_ORPHAN_GRACE_SECS),
			),
		})
	}
}

fn positive(key: &str, value: u64) -> Result<u64, ConfigError> {
	if value == 0 {
		return Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: "must be greater than zero".to_string(),
		});
	}
	Ok(value)
}
