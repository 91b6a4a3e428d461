// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed identifiers.
//!
//! Users and organisations are both keyed by UUIDs; wrapping them keeps a
//! user id from being passed where an organisation id is expected. Both
//! serialize transparently as UUID strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random (v4) id.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			pub fn into_inner(self) -> Uuid {
				self.0
			}

			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a local user account.");
define_id_type!(OrgId, "Unique identifier for an organisation (tenant).");

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::collections::HashSet;

	#[test]
	fn serializes_as_bare_uuid_string() {
		let uuid = Uuid::parse_str("6f1c2a9e-3b6d-4f57-9d0a-2e8b1c4d5f60").unwrap();
		let id = OrgId::new(uuid);

		let json = serde_json::to_string(&id).unwrap();
		assert_eq!(json, "\"6f1c2a9e-3b6d-4f57-9d0a-2e8b1c4d5f60\"");
		assert_eq!(serde_json::from_str::<OrgId>(&json).unwrap(), id);
	}

	#[test]
	fn from_str_rejects_garbage() {
		assert!("not-a-uuid".parse::<UserId>().is_err());
	}

	proptest! {
		#[test]
		fn generated_ids_do_not_collide(count in 1..500usize) {
			let mut seen = HashSet::new();
			for _ in 0..count {
				prop_assert!(seen.insert(UserId::generate()));
			}
		}

		#[test]
		fn display_parses_back(bytes in any::<[u8; 16]>()) {
			let id = UserId::new(Uuid::from_bytes(bytes));
			prop_assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
		}
	}
}
