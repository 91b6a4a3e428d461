// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Short-lived signed login tickets.
//!
//! After a successful sign-in the browser is redirected to the front end
//! with `?ticket=<user_id>.<expires_unix>.<hex_hmac>`. The front end trades
//! it for the signed-in user at `POST /auth/ticket` before it expires.

use std::time::Duration;

use chrono::{DateTime, Utc};
use foundry_common_secret::SecretString;
use foundry_server_auth::UserId;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_TICKET_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TicketError {
	#[error("malformed ticket")]
	Malformed,

	#[error("ticket signature mismatch")]
	BadSignature,

	#[error("ticket expired")]
	Expired,
}

#[derive(Clone, Debug)]
pub struct TicketSigner {
	key: SecretString,
	ttl: Duration,
}

impl TicketSigner {
	pub fn new(key: SecretString, ttl: Duration) -> Self {
		Self { key, ttl }
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	pub fn issue(&self, user_id: &UserId) -> String {
		self.issue_at(user_id, Utc::now())
	}

	pub fn issue_at(&self, user_id: &UserId, now: DateTime<Utc>) -> String {
		let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
		let expires = now.timestamp().saturating_add(ttl);
		let payload = format!("{user_id}.{expires}");
		let signature = hex::encode(self.mac(&payload).finalize().into_bytes());
		format!("{payload}.{signature}")
	}

	pub fn verify(&self, ticket: &str) -> Result<UserId, TicketError> {
		self.verify_at(ticket, Utc::now())
	}

	/// Check the signature (in constant time) before looking at the expiry.
	pub fn verify_at(&self, ticket: &str, now: DateTime<Utc>) -> Result<UserId, TicketError> {
		let (payload, signature) = ticket.rsplit_once('.').ok_or(TicketError::Malformed)?;
		let (user_id, expires) = payload.split_once('.').ok_or(TicketError::Malformed)?;

		let signature = hex::decode(signature).map_err(|_| TicketError::Malformed)?;
		self
			.mac(payload)
			.verify_slice(&signature)
			.map_err(|_| TicketError::BadSignature)?;

		let expires: i64 = expires.parse().map_err(|_| TicketError::Malformed)?;
		if now.timestamp() >= expires {
			return Err(TicketError::Expired);
		}
		user_id.parse().map_err(|_| TicketError::Malformed)
	}

	fn mac(&self, payload: &str) -> HmacSha256 {
		let mut mac = <HmacSha256 as Mac>::new_from_slice(self.key.expose().as_bytes())
			.expect("HMAC can take key of any size");
		mac.update(payload.as_bytes());
		mac
	}
}
