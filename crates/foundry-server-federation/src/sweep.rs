// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic removal of organisations that never got a user.

use std::sync::Arc;
use std::time::Duration;

use foundry_server_db::DbError;

use crate::directory::OrganisationDirectory;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);
pub const DEFAULT_ORPHAN_GRACE: Duration = Duration::from_secs(900);

pub struct OrphanSweeper {
	orgs: Arc<dyn OrganisationDirectory>,
	grace: Duration,
}

impl OrphanSweeper {
	pub fn new(orgs: Arc<dyn OrganisationDirectory>, grace: Duration) -> Self {
		Self { orgs, grace }
	}

	#[tracing::instrument(skip(self), fields(grace_secs = self.grace.as_secs()))]
	pub async fn run_once(&self) -> Result<u64, DbError> {
		let removed = self.orgs.remove_orphaned_organisations(self.grace).await?;
		tracing::debug!(removed, "orphan sweep finished");
		Ok(removed)
	}

	/// Sweep every `interval`, starting one interval from now. Errors are
	/// logged and the loop keeps going.
	pub fn spawn(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
		tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);
			ticker.tick().await;

			loop {
				ticker.tick().await;
				if let Err(e) = self.run_once().await {
					tracing::warn!(error = %e, "orphan sweep failed");
				}
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use foundry_server_auth::{NewOrganization, Organization};
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct CountingOrgs {
		runs: AtomicUsize,
		fail: bool,
	}

	#[async_trait]
	impl OrganisationDirectory for CountingOrgs {
		async fn create_organisation_name(&self) -> Result<String, DbError> {
			Ok("unused".to_string())
		}

		async fn create_organisation(&self, org: NewOrganization) -> Result<Organization, DbError> {
			Ok(org.into_org())
		}

		async fn remove_orphaned_organisations(&self, older_than: Duration) -> Result<u64, DbError> {
			assert_eq!(older_than, DEFAULT_ORPHAN_GRACE);
			self.runs.fetch_add(1, Ordering::SeqCst);
			if self.fail {
				return Err(DbError::Internal("locked".to_string()));
			}
			Ok(2)
		}
	}

	#[tokio::test]
	async fn run_once_passes_grace_period() {
		let orgs = Arc::new(CountingOrgs {
			runs: AtomicUsize::new(0),
			fail: false,
		});
		let sweeper = OrphanSweeper::new(orgs.clone(), DEFAULT_ORPHAN_GRACE);

		assert_eq!(sweeper.run_once().await.unwrap(), 2);
		assert_eq!(orgs.runs.load(Ordering::SeqCst), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn spawned_loop_survives_failures() {
		let orgs = Arc::new(CountingOrgs {
			runs: AtomicUsize::new(0),
			fail: true,
		});
		let sweeper = Arc::new(OrphanSweeper::new(orgs.clone(), DEFAULT_ORPHAN_GRACE));
		let handle = sweeper.spawn(Duration::from_secs(10));

		tokio::time::sleep(Duration::from_secs(35)).await;
		assert_eq!(orgs.runs.load(Ordering::SeqCst), 3);
		handle.abort();
	}
}
