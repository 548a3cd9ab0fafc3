//! Error types for the seeding harness.
//!
//! The taxonomy follows a strict propagation policy: anything that would
//! leave the store structurally broken is a fatal error here; per-document
//! data hiccups (a single duplicate key) are handled locally by the bulk
//! loader and never surface as errors.

use mimoid_db::DbError;
use mimoid_schema::SchemaDefinitionError;
use thiserror::Error;

/// Errors that can occur during seeding operations.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// The declared schema is internally inconsistent. Fatal at startup.
	#[error(transparent)]
	Schema(#[from] SchemaDefinitionError),

	/// Generation requires an identifier pool that was never published or is
	/// empty. Signals a dependency-ordering bug in the invocation sequence;
	/// never retried.
	#[error(
		"reference integrity error: collection '{collection}' requires identifiers \
		 from '{dependency}' but none are available"
	)]
	ReferenceIntegrity {
		/// Collection being generated.
		collection: String,
		/// Collection whose identifier pool is missing or empty.
		dependency: String,
	},

	/// Connectivity or unrecoverable write failure during bulk loading.
	/// Fatal for the current run; retries are the caller's responsibility.
	#[error("load error on collection '{collection}': {message}")]
	Load {
		/// Collection being loaded.
		collection: String,
		/// Underlying failure description.
		message: String,
	},

	/// An index with the same name exists with different options. Requires
	/// manual resolution; never silently overwritten.
	#[error("index conflict on collection '{collection}', index '{index}': {message}")]
	IndexConflict {
		/// Collection owning the index.
		collection: String,
		/// Conflicting index name.
		index: String,
		/// What differs.
		message: String,
	},

	/// A record count was supplied for a collection the schema does not
	/// declare.
	#[error("unknown collection '{0}' in record counts")]
	UnknownCollection(String),

	/// Store operation failed outside of bulk loading.
	#[error(transparent)]
	Db(#[from] DbError),
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_reference_integrity_display() {
		let error = SeedingError::ReferenceIntegrity {
			collection: "orders".to_string(),
			dependency: "users".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"reference integrity error: collection 'orders' requires identifiers \
			 from 'users' but none are available"
		);
	}

	#[rstest]
	fn test_index_conflict_display() {
		let error = SeedingError::IndexConflict {
			collection: "users".to_string(),
			index: "email_unique".to_string(),
			message: "declared unique=true but existing index is unique=false".to_string(),
		};
		let rendered = error.to_string();
		assert!(rendered.contains("index conflict on collection 'users'"));
		assert!(rendered.contains("email_unique"));
	}

	#[rstest]
	fn test_schema_error_is_transparent() {
		let schema_error = SchemaDefinitionError::new(vec!["boom".to_string()]);
		let error: SeedingError = schema_error.clone().into();
		assert_eq!(error.to_string(), schema_error.to_string());
	}
}
