// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Foundry HTTP server: GitHub sign-in endpoints and health.

pub mod error;
pub mod oauth_state;
pub mod routes;
pub mod state;

use axum::{
	routing::{get, post},
	Router,
};

pub use error::ServerError;
pub use oauth_state::OAuthStateStore;
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/auth/github/login", get(routes::auth::login_github))
		.route("/auth/github/callback", get(routes::auth::callback_github))
		.route("/auth/ticket", post(routes::auth::redeem_ticket))
		.with_state(state)
}
