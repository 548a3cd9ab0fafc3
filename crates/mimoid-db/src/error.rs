//! Unified error type for document-store operations.

use thiserror::Error;

/// Result type for store operations.
pub type DbResult<T> = Result<T, DbError>;

/// Server error codes signalling an index option/spec conflict.
const INDEX_OPTIONS_CONFLICT: i32 = 85;
const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

/// Unified error type for store operations.
#[derive(Debug, Error)]
pub enum DbError {
	/// Connection could not be established or was lost.
	#[error("connection error: {0}")]
	Connection(String),

	/// Authentication against the server failed.
	#[error("authentication error: {0}")]
	Authentication(String),

	/// An operation was rejected or failed server-side.
	#[error("execution error: {0}")]
	Execution(String),

	/// BSON (de)serialization failed.
	#[error("serialization error: {0}")]
	Serialization(String),

	/// An index with the same name exists with different options.
	#[error("index conflict: {0}")]
	IndexConflict(String),

	/// Invalid configuration (bad URI, missing database name).
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Database-specific error carrying the original message.
	#[error("database error: {0}")]
	Database(String),
}

impl From<mongodb::error::Error> for DbError {
	fn from(err: mongodb::error::Error) -> Self {
		use mongodb::error::ErrorKind;

		match *err.kind {
			ErrorKind::Authentication { .. } => Self::Authentication(err.to_string()),
			ErrorKind::Io(_) => Self::Connection(err.to_string()),
			ErrorKind::ServerSelection { .. } => Self::Connection(err.to_string()),
			ErrorKind::InvalidArgument { .. } => Self::Execution(err.to_string()),
			ErrorKind::Command(ref command_error)
				if command_error.code == INDEX_OPTIONS_CONFLICT
					|| command_error.code == INDEX_KEY_SPECS_CONFLICT =>
			{
				Self::IndexConflict(command_error.message.clone())
			}
			_ => Self::Database(err.to_string()),
		}
	}
}

// In bson v3.x, both ser::Error and de::Error are type aliases for
// bson::error::Error.
impl From<bson::error::Error> for DbError {
	fn from(err: bson::error::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_display_includes_category() {
		let error = DbError::Connection("refused".to_string());
		assert_eq!(error.to_string(), "connection error: refused");

		let error = DbError::IndexConflict("email_unique".to_string());
		assert_eq!(error.to_string(), "index conflict: email_unique");
	}
}
