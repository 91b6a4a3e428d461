// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local user accounts.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrgId, UserId};

/// A local account.
///
/// `email` is the identity key: at most one row exists per address, and
/// federated sign-ins are matched against it. Each user belongs to exactly
/// one organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub name: String,
	pub email: String,
	pub org_id: OrgId,
	/// Argon2 PHC string. Never sent to clients.
	#[serde(skip_serializing, default)]
	pub password_hash: String,
	pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a user; id and timestamp are assigned by
/// [`NewUser::into_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
	pub name: String,
	pub email: String,
	pub org_id: OrgId,
	pub password_hash: String,
}

impl NewUser {
	pub fn into_user(self) -> User {
		User {
			id: UserId::generate(),
			name: self.name,
			email: self.email,
			org_id: self.org_id,
			password_hash: self.password_hash,
			created_at: Utc::now().trunc_subsecs(6),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn into_user_keeps_fields_and_assigns_id() {
		let org_id = OrgId::generate();
		let user = NewUser {
			name: "newdev".to_string(),
			email: "new@y.com".to_string(),
			org_id,
			password_hash: "$argon2id$stub".to_string(),
		}
		.into_user();

		assert_eq!(user.name, "newdev");
		assert_eq!(user.email, "new@y.com");
		assert_eq!(user.org_id, org_id);
		assert_eq!(user.password_hash, "$argon2id$stub");
	}

	#[test]
	fn created_at_has_microsecond_precision() {
		use chrono::Timelike;

		let user = NewUser {
			name: "n".to_string(),
			email: "e@x".to_string(),
			org_id: OrgId::generate(),
			password_hash: String::new(),
		}
		.into_user();

		assert_eq!(user.created_at.nanosecond() % 1_000, 0);
	}

	#[test]
	fn password_hash_is_not_serialized() {
		let user = NewUser {
			name: "n".to_string(),
			email: "e@x".to_string(),
			org_id: OrgId::generate(),
			password_hash: "$argon2id$secret".to_string(),
		}
		.into_user();

		let json = serde_json::to_string(&user).unwrap();
		assert!(!json.contains("password_hash"));
		assert!(!json.contains("$argon2id$secret"));
	}
}
