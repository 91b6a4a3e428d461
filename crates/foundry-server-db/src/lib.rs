// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for Foundry users and organisations.
//!
//! Each table has a `*Store` trait (the seam other crates depend on) and a
//! `*Repository` implementation over a [`sqlx::SqlitePool`].
//!
//! Conventions:
//! - A missing row is `Ok(None)`, never an error.
//! - A UNIQUE violation on insert is [`DbError::Conflict`].
//! - IDs are UUIDs stored as TEXT; timestamps are RFC 3339 UTC TEXT with a
//!   fixed width so they compare lexically.

pub mod error;
pub mod org;
pub mod pool;
pub mod schema;
pub mod testing;
pub mod user;

mod row;

pub use error::{DbError, Result};
pub use org::{OrgRepository, OrgStore, MAX_ORG_NAME_ATTEMPTS};
pub use pool::create_pool;
pub use schema::ensure_schema;
pub use user::{UserRepository, UserStore};
