// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organisation repository.
//!
//! Besides plain CRUD this owns the orphan query: organisations with no
//! users, which a sign-in leaves behind when it fails between creating the
//! organisation and creating the user (or loses a race for the email).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use foundry_server_auth::{generate_org_name, NewOrganization, OrgId, Organization};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::row::{format_timestamp, parse_timestamp, parse_uuid};

/// How many random names [`OrgRepository::generate_unique_org_name`] tries
/// before giving up.
pub const MAX_ORG_NAME_ATTEMPTS: usize = 8;

#[async_trait]
pub trait OrgStore: Send + Sync {
	async fn create_org(&self, org: NewOrganization) -> Result<Organization, DbError>;
	async fn get_org_by_id(&self, id: &OrgId) -> Result<Option<Organization>, DbError>;
	async fn is_org_name_available(&self, name: &str) -> Result<bool, DbError>;
	async fn generate_unique_org_name(&self) -> Result<String, DbError>;
	async fn list_orphaned_orgs(&self, older_than: Duration) -> Result<Vec<Organization>, DbError>;
	async fn delete_orphaned_orgs(&self, older_than: Duration) -> Result<u64, DbError>;
}

/// Repository for organisation database operations.
#[derive(Clone)]
pub struct OrgRepository {
	pool: SqlitePool,
}

impl OrgRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create an organisation with a fresh id and the current time.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the name is taken.
	#[tracing::instrument(skip(self, org), fields(name = %org.name))]
	pub async fn create_org(&self, org: NewOrganization) -> Result<Organization, DbError> {
		let org = org.into_org();
		self.insert_org(&org).await?;
		Ok(org)
	}

	/// Insert a fully formed organisation, keeping its id and timestamp.
	#[tracing::instrument(skip(self, org), fields(org_id = %org.id, name = %org.name))]
	pub async fn insert_org(&self, org: &Organization) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO organizations (id, name, created_at)
			VALUES (?, ?, ?)
			"#,
		)
		.bind(org.id.to_string())
		.bind(&org.name)
		.bind(format_timestamp(org.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::from_insert(e, "organization with this name"))?;

		tracing::debug!(org_id = %org.id, "organization created");
		Ok(())
	}

	/// # Returns
	/// `None` if no organisation exists with this id.
	#[tracing::instrument(skip(self), fields(org_id = %id))]
	pub async fn get_org_by_id(&self, id: &OrgId) -> Result<Option<Organization>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, created_at
			FROM organizations
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_org(&r)).transpose()
	}

	#[tracing::instrument(skip(self))]
	pub async fn is_org_name_available(&self, name: &str) -> Result<bool, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS count FROM organizations WHERE name = ?")
			.bind(name)
			.fetch_one(&self.pool)
			.await?;
		let count: i64 = row.get("count");
		Ok(count == 0)
	}

	/// Draw random names until one is free.
	///
	/// The name is only reserved once the organisation is inserted, so a
	/// concurrent caller can still take it; `create_org` then reports
	/// `Conflict`.
	///
	/// # Errors
	/// Returns `DbError::Conflict` after [`MAX_ORG_NAME_ATTEMPTS`] collisions.
	#[tracing::instrument(skip(self))]
	pub async fn generate_unique_org_name(&self) -> Result<String, DbError> {
		self.generate_unique_org_name_with(generate_org_name).await
	}

	async fn generate_unique_org_name_with<F>(&self, mut candidate: F) -> Result<String, DbError>
	where
		F: FnMut() -> String + Send,
	{
		for attempt in 1..=MAX_ORG_NAME_ATTEMPTS {
			let name = candidate();
			if self.is_org_name_available(&name).await? {
				return Ok(name);
			}
			tracing::debug!(attempt, "organization name collision");
		}
		Err(DbError::Conflict(format!(
			"no free organization name after {MAX_ORG_NAME_ATTEMPTS} attempts"
		)))
	}

	/// Organisations with zero users created more than `older_than` ago.
	#[tracing::instrument(skip(self))]
	pub async fn list_orphaned_orgs(&self, older_than: Duration) -> Result<Vec<Organization>, DbError> {
		let cutoff = cutoff(older_than)?;
		let rows = sqlx::query(
			r#"
			SELECT o.id, o.name, o.created_at
			FROM organizations o
			WHERE o.created_at < ?
			  AND NOT EXISTS (SELECT 1 FROM users u WHERE u.org_id = o.id)
			ORDER BY o.created_at
			"#,
		)
		.bind(cutoff)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_org).collect()
	}

	/// Delete organisations with zero users created more than `older_than`
	/// ago. Returns how many were removed.
	///
	/// The grace period keeps this from racing a sign-in that has created
	/// its organisation but not yet its user.
	#[tracing::instrument(skip(self))]
	pub async fn delete_orphaned_orgs(&self, older_than: Duration) -> Result<u64, DbError> {
		let cutoff = cutoff(older_than)?;
		let result = sqlx::query(
			r#"
			DELETE FROM organizations
			WHERE created_at < ?
			  AND NOT EXISTS (SELECT 1 FROM users u WHERE u.org_id = organizations.id)
			"#,
		)
		.bind(cutoff)
		.execute(&self.pool)
		.await?;

		let removed = result.rows_affected();
		if removed > 0 {
			tracing::info!(removed, "orphaned organizations deleted");
		}
		Ok(removed)
	}
}

fn cutoff(older_than: Duration) -> Result<String, DbError> {
	let older_than = chrono::Duration::from_std(older_than)
		.map_err(|e| DbError::Internal(format!("Invalid grace period: {e}")))?;
	let cutoff = Utc::now()
		.checked_sub_signed(older_than)
		.ok_or_else(|| DbError::Internal("grace period out of range".to_string()))?;
	Ok(format_timestamp(cutoff))
}

fn row_to_org(row: &sqlx::sqlite::SqliteRow) -> Result<Organization, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");

	Ok(Organization {
		id: OrgId::new(parse_uuid(&id, "org id")?),
		name: row.get("name"),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}

#[async_trait]
impl OrgStore for OrgRepository {
	async fn create_org(&self, org: NewOrganization) -> Result<Organization, DbError> {
		self.create_org(org).await
	}

	async fn get_org_by_id(&self, id: &OrgId) -> Result<Option<Organization>, DbError> {
		self.get_org_by_id(id).await
	}

	async fn is_org_name_available(&self, name: &str) -> Result<bool, DbError> {
		self.is_org_name_available(name).await
	}

	async fn generate_unique_org_name(&self) -> Result<String, DbError> {
		self.generate_unique_org_name().await
	}

	async fn list_orphaned_orgs(&self, older_than: Duration) -> Result<Vec<Organization>, DbError> {
		self.list_orphaned_orgs(older_than).await
	}

	async fn delete_orphaned_orgs(&self, older_than: Duration) -> Result<u64, DbError> {
		self.delete_orphaned_orgs(older_than).await
	}
}
