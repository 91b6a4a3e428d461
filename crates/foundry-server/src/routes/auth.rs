// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub sign-in handlers.
//!
//! The callback always answers with a redirect to the front end: the success
//! URL with a login ticket, or the failure URL with an error code.

use axum::{
	extract::{Query, State},
	response::{IntoResponse, Redirect, Response},
	Json,
};
use foundry_server_auth::User;
use foundry_server_db::UserRepository;
use serde::Deserialize;

use crate::error::ServerError;
use crate::oauth_state::generate_state;
use crate::state::AppState;

const PROVIDER: &str = "github";

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
	pub code: Option<String>,
	pub state: Option<String>,
	pub error: Option<String>,
}

/// GET /auth/github/login - redirect to GitHub's consent page.
#[tracing::instrument(skip(state), fields(provider = PROVIDER))]
pub async fn login_github(State(state): State<AppState>) -> Result<Redirect, ServerError> {
	let oauth_state = generate_state();
	let url = state.github_oauth.authorization_url(&oauth_state)?;
	state
		.oauth_state_store
		.store(oauth_state, PROVIDER)
		.await;

	tracing::debug!("redirecting to GitHub authorization");
	Ok(Redirect::to(&url))
}

/// GET /auth/github/callback - finish sign-in and hand off to the front end.
#[tracing::instrument(skip(state, query), fields(provider = PROVIDER))]
pub async fn callback_github(
	State(state): State<AppState>,
	Query(query): Query<OAuthCallbackQuery>,
) -> Response {
	if let Some(error) = &query.error {
		tracing::warn!(error = %error, "GitHub authorization denied");
		return fail(&state, "provider_denied");
	}

	let state_ok = match &query.state {
		Some(s) => state
			.oauth_state_store
			.validate_and_consume(s, PROVIDER)
			.await
			.is_some(),
		None => false,
	};
	if !state_ok {
		tracing::warn!("invalid or expired OAuth state");
		return fail(&state, "invalid_state");
	}

	let code = query.code.as_deref().unwrap_or_default();
	match state.federation.authenticate(code).await {
		Ok(user) => {
			let ticket = state.ticket_signer.issue(&user.id);
			tracing::info!(user_id = %user.id, "GitHub sign-in complete");
			Redirect::to(&state.redirects.success(&ticket)).into_response()
		}
		Err(e) => {
			tracing::warn!(error = %e, code = e.code(), "GitHub sign-in failed");
			fail(&state, e.code())
		}
	}
}

fn fail(state: &AppState, code: &str) -> Response {
	Redirect::to(&state.redirects.failure(code)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct RedeemTicketRequest {
	pub ticket: String,
}

/// POST /auth/ticket - the front end trades the ticket from the success
/// redirect for the signed-in user.
#[tracing::instrument(skip(state, body))]
pub async fn redeem_ticket(
	State(state): State<AppState>,
	Json(body): Json<RedeemTicketRequest>,
) -> Result<Json<User>, ServerError> {
	let user_id = state.ticket_signer.verify(&body.ticket).map_err(|e| {
		tracing::debug!(error = %e, "ticket rejected");
		ServerError::Unauthorized(e.to_string())
	})?;

	let user = UserRepository::new(state.pool.clone())
		.get_user_by_id(&user_id)
		.await?
		.ok_or_else(|| ServerError::Unauthorized("unknown user".to_string()))?;

	tracing::info!(user_id = %user.id, "login ticket redeemed");
	Ok(Json(user))
}
