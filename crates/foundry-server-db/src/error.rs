// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
	/// Map a UNIQUE constraint violation to [`DbError::Conflict`], leaving
	/// every other error as [`DbError::Sqlx`].
	pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
		match &err {
			sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("{what} already exists"))
			}
			_ => DbError::Sqlx(err),
		}
	}

	pub fn is_conflict(&self) -> bool {
		matches!(self, DbError::Conflict(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_conflict_is_conflict() {
		assert!(DbError::Conflict("user already exists".to_string()).is_conflict());
		assert!(!DbError::Internal("bad row".to_string()).is_conflict());
		assert!(!DbError::Sqlx(sqlx::Error::RowNotFound).is_conflict());
	}
}
