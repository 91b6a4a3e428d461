// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local account storage as seen by the sign-in flow.
//!
//! The SQLite repositories implement these directly; tests substitute
//! in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;
use foundry_common_secret::SecretString;
use foundry_server_auth::{
	generate_password, hash_password, NewOrganization, NewUser, Organization, PasswordError, User,
};
use foundry_server_db::{DbError, OrgRepository, OrgStore, UserRepository, UserStore};

#[async_trait]
pub trait UserDirectory: Send + Sync {
	/// `Ok(None)` when no account has this address.
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

	fn create_password(&self) -> SecretString;

	async fn hash_user_password(&self, plaintext: SecretString) -> Result<String, PasswordError>;

	/// `DbError::Conflict` when the email is already taken.
	async fn create_user(&self, user: NewUser) -> Result<User, DbError>;
}

#[async_trait]
pub trait OrganisationDirectory: Send + Sync {
	async fn create_organisation_name(&self) -> Result<String, DbError>;

	async fn create_organisation(&self, org: NewOrganization) -> Result<Organization, DbError>;

	/// Delete organisations with no users that are older than `older_than`.
	async fn remove_orphaned_organisations(&self, older_than: Duration) -> Result<u64, DbError>;
}

/// Argon2 is deliberately slow; keep it off the async worker threads.
pub async fn hash_on_blocking_pool(plaintext: SecretString) -> Result<String, PasswordError> {
	tokio::task::spawn_blocking(move || hash_password(plaintext.expose()))
		.await
		.map_err(|e| PasswordError::Hash(format!("hashing task failed: {e}")))?
}

#[async_trait]
impl UserDirectory for UserRepository {
	async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		UserStore::get_user_by_email(self, email).await
	}

	fn create_password(&self) -> SecretString {
		generate_password()
	}

	async fn hash_user_password(&self, plaintext: SecretString) -> Result<String, PasswordError> {
		hash_on_blocking_pool(plaintext).await
	}

	async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
		UserStore::create_user(self, user).await
	}
}

#[async_trait]
impl OrganisationDirectory for OrgRepository {
	async fn create_organisation_name(&self) -> Result<String, DbError> {
		OrgStore::generate_unique_org_name(self).await
	}

	async fn create_organisation(&self, org: NewOrganization) -> Result<Organization, DbError> {
		OrgStore::create_org(self, org).await
	}

	async fn remove_orphaned_organisations(&self, older_than: Duration) -> Result<u64, DbError> {
		OrgStore::delete_orphaned_orgs(self, older_than).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use foundry_server_auth::verify_password;
	use foundry_server_db::testing::create_migrated_test_pool;

	#[tokio::test]
	async fn repository_directory_hashes_generated_password() {
		let pool = create_migrated_test_pool().await;
		let users = UserRepository::new(pool);

		let password = users.create_password();
		let plain = password.expose().clone();
		let hash = users.hash_user_password(password).await.unwrap();

		assert!(verify_password(&plain, &hash).unwrap());
	}

	#[tokio::test]
	async fn repository_directory_provisions_org_then_user() {
		let pool = create_migrated_test_pool().await;
		let users = UserRepository::new(pool.clone());
		let orgs = OrgRepository::new(pool);

		let name = orgs.create_organisation_name().await.unwrap();
		let org = orgs
			.create_organisation(NewOrganization { name: name.clone() })
			.await
			.unwrap();
		assert_eq!(org.name, name);

		let user = UserDirectory::create_user(
			&users,
			NewUser {
				name: "newdev".to_string(),
				email: "new@y.com".to_string(),
				org_id: org.id,
				password_hash: "$argon2id$stub".to_string(),
			},
		)
		.await
		.unwrap();

		let found = UserDirectory::get_user_by_email(&users, "new@y.com")
			.await
			.unwrap();
		assert_eq!(found, Some(user));
		assert_eq!(orgs.remove_orphaned_organisations(Duration::ZERO).await.unwrap(), 0);
	}
}
