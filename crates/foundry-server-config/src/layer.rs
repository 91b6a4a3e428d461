// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::sections::{
	DatabaseConfig, DatabaseConfigLayer, FederationConfig, FederationConfigLayer, FrontendConfig,
	FrontendConfigLayer, GitHubConfig, GitHubConfigLayer, HttpConfig, HttpConfigLayer,
	LoggingConfig, LoggingConfigLayer,
};

/// Server configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub github: Option<GitHubConfigLayer>,
	#[serde(default)]
	pub frontend: Option<FrontendConfigLayer>,
	#[serde(default)]
	pub federation: Option<FederationConfigLayer>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub github: GitHubConfig,
	pub frontend: FrontendConfig,
	pub federation: FederationConfig,
}

impl ServerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(
			&mut self.database,
			other.database,
			DatabaseConfigLayer::merge,
		);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_option(&mut self.github, other.github, GitHubConfigLayer::merge);
		merge_option(
			&mut self.frontend,
			other.frontend,
			FrontendConfigLayer::merge,
		);
		merge_option(
			&mut self.federation,
			other.federation,
			FederationConfigLayer::merge,
		);
	}

	/// Apply defaults and validate.
	pub fn finalize(self) -> Result<ServerConfig, ConfigError> {
		let http = self.http.unwrap_or_default().finalize();
		let github = self.github.unwrap_or_default().build(&http.base_url)?;
		Ok(ServerConfig {
			database: self.database.unwrap_or_default().finalize()?,
			logging: self.logging.unwrap_or_default().finalize(),
			frontend: self.frontend.unwrap_or_default().finalize(),
			federation: self.federation.unwrap_or_default().finalize()?,
			github,
			http,
		})
	}

	pub(crate) fn http_mut(&mut self) -> &mut HttpConfigLayer {
		self.http.get_or_insert_with(Default::default)
	}

	pub(crate) fn database_mut(&mut self) -> &mut DatabaseConfigLayer {
		self.database.get_or_insert_with(Default::default)
	}

	pub(crate) fn logging_mut(&mut self) -> &mut LoggingConfigLayer {
		self.logging.get_or_insert_with(Default::default)
	}

	pub(crate) fn github_mut(&mut self) -> &mut GitHubConfigLayer {
		self.github.get_or_insert_with(Default::default)
	}

	pub(crate) fn frontend_mut(&mut self) -> &mut FrontendConfigLayer {
		self.frontend.get_or_insert_with(Default::default)
	}

	pub(crate) fn federation_mut(&mut self) -> &mut FederationConfigLayer {
		self.federation.get_or_insert_with(Default::default)
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
