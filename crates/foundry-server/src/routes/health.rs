// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub version: &'static str,
	pub timestamp: String,
	pub database: ComponentHealth,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
	pub healthy: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// GET /health - 200 when the database answers, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
		Ok(_) => ComponentHealth {
			healthy: true,
			error: None,
		},
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			ComponentHealth {
				healthy: false,
				error: Some("database unreachable".to_string()),
			}
		}
	};

	let (code, status) = if database.healthy {
		(StatusCode::OK, "healthy")
	} else {
		(StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
	};

	(
		code,
		Json(HealthResponse {
			status,
			version: env!("CARGO_PKG_VERSION"),
			timestamp: chrono::Utc::now().to_rfc3339(),
			database,
		}),
	)
}
