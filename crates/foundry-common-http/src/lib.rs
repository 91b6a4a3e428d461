// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction.
//!
//! Every outbound call made by the server (token exchange, provider API)
//! goes through a client built here so it carries the same User-Agent and
//! an explicit timeout. Timeouts live at this layer; callers above do not
//! add their own.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Timeout applied by [`new_client`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the standard User-Agent string: `foundry/{version}`.
pub fn user_agent() -> String {
	format!("foundry/{}", env!("CARGO_PKG_VERSION"))
}

/// A client builder preloaded with the Foundry User-Agent.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Build a client with the Foundry User-Agent and the given timeout.
///
/// # Errors
/// Returns the underlying `reqwest` error if the TLS backend cannot be
/// initialised.
pub fn new_client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	builder().timeout(timeout).build()
}

/// Build a client with the Foundry User-Agent and [`DEFAULT_TIMEOUT`].
pub fn new_client() -> Result<Client, reqwest::Error> {
	new_client_with_timeout(DEFAULT_TIMEOUT)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_name_and_version() {
		let ua = user_agent();
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0], "foundry");
		assert!(!parts[1].is_empty());
	}

	#[test]
	fn clients_build() {
		assert!(new_client().is_ok());
		assert!(new_client_with_timeout(Duration::from_millis(250)).is_ok());
	}
}
