// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organisations (tenants).
//!
//! Every account provisioned by a federated sign-in gets its own
//! organisation. Names are system generated (`adjective-noun-NNNN`); the
//! storage layer is responsible for rejecting and regenerating duplicates.

use chrono::{DateTime, SubsecRound, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::OrgId;

const ADJECTIVES: &[&str] = &[
	"amber", "brisk", "calm", "crimson", "dapper", "eager", "fabled", "gentle", "hidden", "ivory",
	"jolly", "keen", "lucid", "mellow", "nimble", "onyx", "placid", "quiet", "rapid", "silver",
	"tidal", "umber", "vivid", "wry", "young", "zesty",
];

const NOUNS: &[&str] = &[
	"anvil", "beacon", "cedar", "delta", "ember", "falcon", "glacier", "harbor", "island",
	"juniper", "kestrel", "lantern", "meadow", "nebula", "orchard", "pine", "quarry", "river",
	"summit", "thicket", "upland", "valley", "willow", "yarrow", "zephyr",
];

/// A tenant. Owned by the organisation directory; never mutated by the
/// sign-in flow after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
	pub id: OrgId,
	pub name: String,
	pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating an organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
	pub name: String,
}

impl NewOrganization {
	pub fn into_org(self) -> Organization {
		Organization {
			id: OrgId::generate(),
			name: self.name,
			created_at: Utc::now().trunc_subsecs(6),
		}
	}
}

/// Generate a candidate organisation name such as `lucid-harbor-0427`.
///
/// Roughly 6.5 million combinations; callers must still check uniqueness.
pub fn generate_org_name() -> String {
	let mut rng = rand::thread_rng();
	let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("quiet");
	let noun = NOUNS.choose(&mut rng).copied().unwrap_or("harbor");
	let suffix: u16 = rng.gen_range(0..10_000);
	format!("{adjective}-{noun}-{suffix:04}")
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn into_org_assigns_fresh_ids() {
		let a = NewOrganization {
			name: "amber-anvil-0001".to_string(),
		}
		.into_org();
		let b = NewOrganization {
			name: "amber-anvil-0001".to_string(),
		}
		.into_org();

		assert_eq!(a.name, "amber-anvil-0001");
		assert_ne!(a.id, b.id);
	}

	#[test]
	fn created_at_has_microsecond_precision() {
		use chrono::Timelike;

		let org = NewOrganization {
			name: "calm-cedar-0002".to_string(),
		}
		.into_org();
		assert_eq!(org.created_at.nanosecond() % 1_000, 0);
	}

	proptest! {
		#[test]
		fn generated_names_have_three_parts(_seed in 0u8..64) {
			let name = generate_org_name();
			let parts: Vec<&str> = name.split('-').collect();

			prop_assert_eq!(parts.len(), 3);
			prop_assert!(ADJECTIVES.contains(&parts[0]));
			prop_assert!(NOUNS.contains(&parts[1]));
			prop_assert_eq!(parts[2].len(), 4);
			prop_assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
		}
	}
}
