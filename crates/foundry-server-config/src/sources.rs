// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: TOML file and environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use foundry_common_secret::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;

/// Prefix for every server environment variable.
pub const ENV_PREFIX: &str = "FOUNDRY_SERVER_";

/// Names the TOML config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "FOUNDRY_SERVER_CONFIG";

/// Load a TOML layer from `path`. A missing file is an error: the caller
/// asked for it by name.
pub fn load_file(path: &Path) -> Result<ServerConfigLayer, ConfigError> {
	debug!(path = %path.display(), "loading config file");

	let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
		path: path.to_path_buf(),
		source,
	})?;
	let layer = toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
		path: path.to_path_buf(),
		source,
	})?;

	trace!("parsed config file layer");
	Ok(layer)
}

/// Environment variable source.
///
/// Convention: `{prefix}<FIELD>`, e.g. `FOUNDRY_SERVER_PORT`. Secrets also
/// accept `{prefix}<FIELD>_FILE`.
pub struct EnvSource {
	prefix: String,
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::with_prefix(ENV_PREFIX)
	}
}

impl EnvSource {
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	fn key(&self, field: &str) -> String {
		format!("{}{field}", self.prefix)
	}

	fn string(&self, field: &str) -> Option<String> {
		std::env::var(self.key(field))
			.ok()
			.map(|v| v.trim().to_string())
			.filter(|v| !v.is_empty())
	}

	fn parsed<T>(&self, field: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		self
			.string(field)
			.map(|raw| {
				raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
					key: self.key(field),
					message: e.to_string(),
				})
			})
			.transpose()
	}

	fn bool(&self, field: &str) -> Result<Option<bool>, ConfigError> {
		self
			.string(field)
			.map(|raw| match raw.to_ascii_lowercase().as_str() {
				"1" | "true" | "yes" | "on" => Ok(true),
				"0" | "false" | "no" | "off" => Ok(false),
				_ => Err(ConfigError::InvalidValue {
					key: self.key(field),
					message: format!("expected a boolean, got {raw:?}"),
				}),
			})
			.transpose()
	}

	pub fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!(prefix = %self.prefix, "loading environment variables");
		let mut layer = ServerConfigLayer::default();

		if let Some(host) = self.string("HOST") {
			layer.http_mut().host = Some(host);
		}
		if let Some(port) = self.parsed("PORT")? {
			layer.http_mut().port = Some(port);
		}
		if let Some(base_url) = self.string("BASE_URL") {
			layer.http_mut().base_url = Some(base_url);
		}

		if let Some(url) = self.string("DATABASE_URL") {
			layer.database_mut().url = Some(url);
		}
		if let Some(max) = self.parsed("DATABASE_MAX_CONNECTIONS")? {
			layer.database_mut().max_connections = Some(max);
		}

		if let Some(level) = self.string("LOG_LEVEL") {
			layer.logging_mut().level = Some(level);
		}

		if let Some(client_id) = self.string("GITHUB_CLIENT_ID") {
			layer.github_mut().client_id = Some(client_id);
		}
		if let Some(secret) = load_secret_env(&self.key("GITHUB_CLIENT_SECRET"))? {
			trace!("loaded GitHub client secret from environment");
			layer.github_mut().client_secret = Some(secret);
		}
		if let Some(redirect_uri) = self.string("GITHUB_REDIRECT_URI") {
			layer.github_mut().redirect_uri = Some(redirect_uri);
		}
		if let Some(scopes) = self.string("GITHUB_SCOPES") {
			layer.github_mut().scopes = Some(
				scopes
					.split([' ', ','])
					.filter(|s| !s.is_empty())
					.map(str::to_string)
					.collect(),
			);
		}
		if let Some(url) = self.string("GITHUB_AUTHORIZE_URL") {
			layer.github_mut().authorize_url = Some(url);
		}
		if let Some(url) = self.string("GITHUB_TOKEN_URL") {
			layer.github_mut().token_url = Some(url);
		}
		if let Some(url) = self.string("GITHUB_API_BASE_URL") {
			layer.github_mut().api_base_url = Some(url);
		}

		if let Some(url) = self.string("FRONTEND_SUCCESS_URL") {
			layer.frontend_mut().success_url = Some(url);
		}
		if let Some(url) = self.string("FRONTEND_FAILURE_URL") {
			layer.frontend_mut().failure_url = Some(url);
		}

		if let Some(require) = self.bool("REQUIRE_VERIFIED_EMAIL")? {
			layer.federation_mut().require_verified_email = Some(require);
		}
		if let Some(secret) = load_secret_env(&self.key("TICKET_SECRET"))? {
			trace!("loaded ticket secret from environment");
			layer.federation_mut().ticket_secret = Some(secret);
		}
		if let Some(ttl) = self.parsed("TICKET_TTL_SECS")? {
			layer.federation_mut().ticket_ttl_secs = Some(ttl);
		}
		if let Some(interval) = self.parsed("ORPHAN_SWEEP_INTERVAL_SECS")? {
			layer.federation_mut().orphan_sweep_interval_secs = Some(interval);
		}
		if let Some(grace) = self.parsed("ORPHAN_GRACE_SECS")? {
			layer.federation_mut().orphan_grace_secs = Some(grace);
		}

		Ok(layer)
	}
}

/// Resolve the config file path: the explicit argument, then
/// `FOUNDRY_SERVER_CONFIG`, then none.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
	explicit
		.map(Path::to_path_buf)
		.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}
