// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One module per `[section]` of the config file.

mod database;
mod federation;
mod frontend;
mod github;
mod http;
mod logging;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use federation::{FederationConfig, FederationConfigLayer};
pub use frontend::{FrontendConfig, FrontendConfigLayer};
pub use github::{GitHubConfig, GitHubConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
