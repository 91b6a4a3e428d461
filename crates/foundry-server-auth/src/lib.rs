// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account and tenant primitives for Foundry.
//!
//! - [`types`]: UUID newtypes ([`UserId`], [`OrgId`])
//! - [`user`]: the local account ([`User`]) and its creation request
//! - [`org`]: the tenant ([`Organization`]) and name generation
//! - [`password`]: random password generation and Argon2id hashing

mod argon2_config;
pub mod org;
pub mod password;
pub mod types;
pub mod user;

pub use org::{generate_org_name, NewOrganization, Organization};
pub use password::{generate_password, hash_password, verify_password, PasswordError};
pub use types::{OrgId, UserId};
pub use user::{NewUser, User};
