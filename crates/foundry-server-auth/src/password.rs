// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password generation and hashing.
//!
//! Accounts created by a federated sign-in never see their password: one is
//! generated, hashed and discarded so the `password_hash` column is always
//! populated with something nobody knows.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use foundry_common_secret::SecretString;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::instrument;

use crate::argon2_config::argon2_instance;

/// Length of generated passwords, in alphanumeric characters (~190 bits).
pub const GENERATED_PASSWORD_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
	#[error("failed to hash password: {0}")]
	Hash(String),

	#[error("stored password hash is malformed: {0}")]
	MalformedHash(String),
}

/// Generate a random alphanumeric password.
pub fn generate_password() -> SecretString {
	let password: String = rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(GENERATED_PASSWORD_LEN)
		.map(char::from)
		.collect();
	SecretString::new(password)
}

/// Hash a plaintext password into an Argon2id PHC string with a fresh salt.
#[instrument(name = "password.hash", skip_all)]
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(plaintext.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash
/// cannot be parsed.
#[instrument(name = "password.verify", skip_all)]
pub fn verify_password(plaintext: &str, stored: &str) -> Result<bool, PasswordError> {
	let parsed = PasswordHash::new(stored).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
	Ok(
		argon2_instance()
			.verify_password(plaintext.as_bytes(), &parsed)
			.is_ok(),
	)
}
