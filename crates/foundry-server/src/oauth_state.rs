// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OAuth `state` parameter store for CSRF protection.
//!
//! `/auth/github/login` stores a random state; the callback must present it
//! back. States are single use, bound to a provider, and expire after ten
//! minutes. The login route is unauthenticated, so the store holds at most
//! [`MAX_PENDING_STATES`] entries; when full, expired entries are dropped and
//! then the oldest live one is evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::instrument;

/// State expiry time in seconds (10 minutes).
const STATE_EXPIRY_SECONDS: u64 = 600;

/// Upper bound on outstanding login attempts.
pub const MAX_PENDING_STATES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct OAuthStateEntry {
	pub provider: String,
	pub created_at: Instant,
}

/// In-memory store for OAuth state parameters.
#[derive(Debug, Clone)]
pub struct OAuthStateStore {
	states: Arc<RwLock<HashMap<String, OAuthStateEntry>>>,
	expiry: Duration,
	capacity: usize,
}

impl Default for OAuthStateStore {
	fn default() -> Self {
		Self::new()
	}
}

impl OAuthStateStore {
	pub fn new() -> Self {
		Self::with_expiry(Duration::from_secs(STATE_EXPIRY_SECONDS))
	}

	pub fn with_expiry(expiry: Duration) -> Self {
		Self::with_limits(expiry, MAX_PENDING_STATES)
	}

	pub fn with_limits(expiry: Duration, capacity: usize) -> Self {
		Self {
			states: Arc::new(RwLock::new(HashMap::new())),
			expiry,
			capacity: capacity.max(1),
		}
	}

	/// Never log the state value.
	#[instrument(skip(self, state), fields(provider = %provider))]
	pub async fn store(&self, state: String, provider: &str) {
		let entry = OAuthStateEntry {
			provider: provider.to_string(),
			created_at: Instant::now(),
		};
		let mut states = self.states.write().await;
		if states.len() >= self.capacity && !states.contains_key(&state) {
			states.retain(|_, e| e.created_at.elapsed() < self.expiry);
		}
		if states.len() >= self.capacity && !states.contains_key(&state) {
			let oldest = states
				.iter()
				.min_by_key(|(_, e)| e.created_at)
				.map(|(k, _)| k.clone());
			if let Some(oldest) = oldest {
				states.remove(&oldest);
				tracing::warn!(capacity = self.capacity, "OAuth state store full, evicted oldest state");
			}
		}
		states.insert(state, entry);
		tracing::debug!(total_states = states.len(), "Stored OAuth state");
	}

	/// Remove `state` and return it if it was live and issued for
	/// `expected_provider`.
	///
	/// The state is removed even when validation fails.
	#[instrument(skip(self, state), fields(expected_provider = %expected_provider))]
	pub async fn validate_and_consume(
		&self,
		state: &str,
		expected_provider: &str,
	) -> Option<OAuthStateEntry> {
		let entry = self.states.write().await.remove(state);
		let Some(entry) = entry else {
			tracing::debug!("OAuth state not found");
			return None;
		};

		if entry.created_at.elapsed() >= self.expiry {
			tracing::debug!("OAuth state expired");
			return None;
		}
		if entry.provider != expected_provider {
			tracing::warn!(actual_provider = %entry.provider, "OAuth state provider mismatch");
			return None;
		}

		tracing::debug!("OAuth state validated and consumed");
		Some(entry)
	}

	/// Drop expired entries. Returns how many were removed.
	#[instrument(skip(self))]
	pub async fn cleanup_expired(&self) -> usize {
		let mut states = self.states.write().await;
		let before = states.len();
		states.retain(|_, entry| entry.created_at.elapsed() < self.expiry);
		let removed = before - states.len();
		if removed > 0 {
			tracing::debug!(removed, remaining = states.len(), "Cleaned up expired OAuth states");
		}
		removed
	}

	pub async fn len(&self) -> usize {
		self.states.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.states.read().await.is_empty()
	}

	/// Run [`cleanup_expired`](Self::cleanup_expired) every `interval`.
	pub fn spawn_cleanup(self, interval: Duration) -> tokio::task::JoinHandle<()> {
		tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);
			ticker.tick().await;
			loop {
				ticker.tick().await;
				self.cleanup_expired().await;
			}
		})
	}
}

/// Random state parameter (UUID v4, 122 bits).
pub fn generate_state() -> String {
	uuid::Uuid::new_v4().to_string()
}
