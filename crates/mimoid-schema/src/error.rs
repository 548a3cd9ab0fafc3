//! Error types for schema definitions.

use thiserror::Error;

/// The declared schema is internally inconsistent.
///
/// Carries **every** violation found, not just the first, so authors can fix
/// all problems in one pass. Fatal at startup; never recovered automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid schema definition ({} violation(s)): {}", violations.len(), violations.join("; "))]
pub struct SchemaDefinitionError {
	/// Human-readable description of each violation.
	pub violations: Vec<String>,
}

impl SchemaDefinitionError {
	/// Creates an error from a list of violations.
	pub fn new(violations: Vec<String>) -> Self {
		Self { violations }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_display_lists_all_violations() {
		let error = SchemaDefinitionError::new(vec![
			"duplicate collection name 'users'".to_string(),
			"index 'email_idx' references unknown field 'email'".to_string(),
		]);
		let rendered = error.to_string();
		assert!(rendered.contains("2 violation(s)"));
		assert!(rendered.contains("duplicate collection name 'users'"));
		assert!(rendered.contains("unknown field 'email'"));
	}
}
