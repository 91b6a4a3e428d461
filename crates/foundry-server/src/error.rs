// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Configuration error: {0}")]
	Config(#[from] foundry_server_config::ConfigError),

	#[error("Database error: {0}")]
	Db(#[from] foundry_server_db::DbError),

	#[error("GitHub client error: {0}")]
	GitHub(#[from] foundry_server_auth_github::OAuthError),

	#[error("Invalid OAuth configuration: {0}")]
	OAuthConfig(#[from] foundry_server_auth_github::ConfigError),

	#[error("Invalid redirect configuration: {0}")]
	Redirect(#[from] foundry_server_federation::RedirectConfigError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Unauthorized: {0}")]
	Unauthorized(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		if let ServerError::Unauthorized(message) = self {
			return (
				StatusCode::UNAUTHORIZED,
				Json(ErrorResponse {
					error: "unauthorized".to_string(),
					message,
				}),
			)
				.into_response();
		}

		tracing::error!(error = %self, "request failed");
		let error = match &self {
			ServerError::Db(_) => "database_error",
			_ => "internal_error",
		};
		(
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(ErrorResponse {
				error: error.to_string(),
				message: "An internal error occurred".to_string(),
			}),
		)
			.into_response()
	}
}
