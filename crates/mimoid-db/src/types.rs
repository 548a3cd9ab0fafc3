//! Result types for store operations.

use bson::Document;

/// Outcome of a bulk insert.
///
/// Duplicate-key violations on individual documents are reported here rather
/// than as an error so callers can apply a skip-and-continue policy; every
/// other write failure aborts the call.
#[derive(Debug, Clone, Default)]
pub struct InsertManyOutcome {
	/// Number of documents actually persisted.
	pub inserted: u64,

	/// Per-document duplicate-key violations, in batch order.
	pub duplicates: Vec<DuplicateKey>,
}

/// One duplicate-key violation inside a bulk insert.
#[derive(Debug, Clone)]
pub struct DuplicateKey {
	/// Position of the offending document within the submitted batch.
	pub index: usize,

	/// Server message naming the violated index and key.
	pub message: String,
}

/// Signature of an index as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
	/// Index name.
	pub name: String,

	/// Ordered key document (field name to direction/kind).
	pub keys: Document,

	/// Whether the index enforces uniqueness.
	pub unique: bool,

	/// Whether documents missing the indexed fields are skipped.
	pub sparse: bool,
}

#[cfg(test)]
mod tests {
	use super::*;
	use bson::doc;
	use rstest::rstest;

	#[rstest]
	fn test_outcome_default_is_empty() {
		let outcome = InsertManyOutcome::default();
		assert_eq!(outcome.inserted, 0);
		assert!(outcome.duplicates.is_empty());
	}

	#[rstest]
	fn test_index_spec_equality_covers_signature() {
		let a = IndexSpec {
			name: "email_unique".to_string(),
			keys: doc! { "email": 1 },
			unique: true,
			sparse: false,
		};
		let mut b = a.clone();
		assert_eq!(a, b);

		b.unique = false;
		assert_ne!(a, b);
	}
}
