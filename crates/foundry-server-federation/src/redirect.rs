// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where the browser goes once the sign-in outcome is known.

use url::Url;

#[derive(Debug, thiserror::Error)]
#[error("invalid {which} URL: {source}")]
pub struct RedirectConfigError {
	which: &'static str,
	#[source]
	source: url::ParseError,
}

#[derive(Debug, Clone)]
pub struct RedirectTargets {
	success: Url,
	failure: Url,
}

impl RedirectTargets {
	pub fn new(success_url: &str, failure_url: &str) -> Result<Self, RedirectConfigError> {
		let parse = |which, raw: &str| {
			Url::parse(raw).map_err(|source| RedirectConfigError { which, source })
		};
		Ok(Self {
			success: parse("success", success_url)?,
			failure: parse("failure", failure_url)?,
		})
	}

	/// Success URL with `ticket` appended; existing query parameters stay.
	pub fn success(&self, ticket: &str) -> String {
		with_param(&self.success, "ticket", ticket)
	}

	/// Failure URL with `error` appended.
	pub fn failure(&self, code: &str) -> String {
		with_param(&self.failure, "error", code)
	}
}

fn with_param(base: &Url, key: &str, value: &str) -> String {
	let mut url = base.clone();
	url.query_pairs_mut().append_pair(key, value);
	url.to_string()
}
