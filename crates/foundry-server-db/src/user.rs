// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.

use async_trait::async_trait;
use foundry_server_auth::{NewUser, OrgId, User, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{format_timestamp, parse_timestamp, parse_uuid};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: NewUser) -> Result<User, DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
	async fn count_users_in_org(&self, org_id: &OrgId) -> Result<i64, DbError>;
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a user.
	///
	/// # Errors
	/// - `DbError::Conflict` if the email is already taken (case-insensitive).
	/// - `DbError::Sqlx` for anything else, including an `org_id` that does
	///   not reference an existing organisation.
	#[tracing::instrument(skip(self, user), fields(org_id = %user.org_id))]
	pub async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
		let user = user.into_user();
		sqlx::query(
			r#"
			INSERT INTO users (id, name, email, org_id, password_hash, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.name)
		.bind(&user.email)
		.bind(user.org_id.to_string())
		.bind(&user.password_hash)
		.bind(format_timestamp(user.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "user with this email"))?;

		tracing::debug!(user_id = %user.id, "user created");
		Ok(user)
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, email, org_id, password_hash, created_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Look a user up by email, ignoring case.
	///
	/// # Returns
	/// `None` if no user has this address.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, email, org_id, password_hash, created_at
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		let result = row.map(|r| row_to_user(&r)).transpose()?;
		if let Some(ref user) = result {
			tracing::debug!(user_id = %user.id, "user found by email");
		}
		Ok(result)
	}

	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn count_users_in_org(&self, org_id: &OrgId) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE org_id = ?")
			.bind(org_id.to_string())
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("count"))
	}
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let org_id: String = row.get("org_id");
	let created_at: String = row.get("created_at");

	Ok(User {
		id: UserId::new(parse_uuid(&id, "user id")?),
		name: row.get("name"),
		email: row.get("email"),
		org_id: OrgId::new(parse_uuid(&org_id, "org id")?),
		password_hash: row.get("password_hash"),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
		self.create_user(user).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		self.get_user_by_email(email).await
	}

	async fn count_users_in_org(&self, org_id: &OrgId) -> Result<i64, DbError> {
		self.count_users_in_org(org_id).await
	}
}
