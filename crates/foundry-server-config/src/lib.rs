// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the Foundry server.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, then
//! `FOUNDRY_SERVER_*` environment variables. Every section is a
//! `*ConfigLayer` of `Option` fields that merge field by field and are
//! finalized into a validated `*Config`.

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use std::path::Path;

pub use error::ConfigError;
pub use layer::{ServerConfig, ServerConfigLayer};
pub use sections::*;
pub use sources::{config_path, load_file, EnvSource, CONFIG_PATH_ENV, ENV_PREFIX};

/// Load the server configuration from the file (if any) and environment.
#[tracing::instrument(skip_all)]
pub fn load_config(explicit_path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
	load_config_with(explicit_path, &EnvSource::default())
}

pub fn load_config_with(
	explicit_path: Option<&Path>,
	env: &EnvSource,
) -> Result<ServerConfig, ConfigError> {
	let mut layer = ServerConfigLayer::default();
	if let Some(path) = config_path(explicit_path) {
		layer.merge(load_file(&path)?);
	}
	layer.merge(env.load()?);
	layer.finalize()
}
