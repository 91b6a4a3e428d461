// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where the browser lands after sign-in.

use serde::Deserialize;

const DEFAULT_SUCCESS_URL: &str = "http://localhost:3000/auth/complete";
const DEFAULT_FAILURE_URL: &str = "http://localhost:3000/auth/error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
	/// Receives `?ticket=...` on success.
	pub success_url: String,
	/// Receives `?error=<code>` on failure.
	pub failure_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontendConfigLayer {
	#[serde(default)]
	pub success_url: Option<String>,
	#[serde(default)]
	pub failure_url: Option<String>,
}

impl FrontendConfigLayer {
	pub fn merge(&mut self, other: FrontendConfigLayer) {
		if other.success_url.is_some() {
			self.success_url = other.success_url;
		}
		if other.failure_url.is_some() {
			self.failure_url = other.failure_url;
		}
	}

	pub fn finalize(self) -> FrontendConfig {
		FrontendConfig {
			success_url: self
				.success_url
				.unwrap_or_else(|| DEFAULT_SUCCESS_URL.to_string()),
			failure_url: self
				.failure_url
				.unwrap_or_else(|| DEFAULT_FAILURE_URL.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_override_keeps_other_default() {
		let config = FrontendConfigLayer {
			success_url: Some("https://app.example.com/welcome".to_string()),
			failure_url: None,
		}
		.finalize();
		assert_eq!(config.success_url, "https://app.example.com/welcome");
		assert_eq!(config.failure_url, DEFAULT_FAILURE_URL);
	}
}
