// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Table definitions.
//!
//! `users.email` is UNIQUE (case-insensitive). That constraint is what keeps
//! two concurrent first sign-ins for one address from producing two accounts.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const CREATE_ORGANIZATIONS: &str = r#"
	CREATE TABLE IF NOT EXISTS organizations (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL UNIQUE,
		created_at TEXT NOT NULL
	)
"#;

const CREATE_USERS: &str = r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL,
		email TEXT NOT NULL UNIQUE COLLATE NOCASE,
		org_id TEXT NOT NULL REFERENCES organizations(id),
		password_hash TEXT NOT NULL,
		created_at TEXT NOT NULL
	)
"#;

const CREATE_USERS_ORG_INDEX: &str =
	"CREATE INDEX IF NOT EXISTS idx_users_org_id ON users(org_id)";

/// Create every table and index if missing. Idempotent.
#[tracing::instrument(skip(pool))]
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in [CREATE_ORGANIZATIONS, CREATE_USERS, CREATE_USERS_ORG_INDEX] {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!("schema ensured");
	Ok(())
}
