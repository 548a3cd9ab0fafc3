//! Validation report types.
//!
//! A report is constructed fresh on each validation run and never mutated
//! after being returned.

use serde::Serialize;

/// Pass/fail outcome of one validation aspect, with accumulated errors.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
	/// Whether the check passed.
	pub passed: bool,

	/// One entry per violation found.
	pub errors: Vec<String>,
}

impl CheckOutcome {
	/// A passing outcome with no errors.
	pub fn passed() -> Self {
		Self {
			passed: true,
			errors: Vec::new(),
		}
	}

	/// Builds an outcome from accumulated errors: passing iff empty.
	pub fn from_errors(errors: Vec<String>) -> Self {
		Self {
			passed: errors.is_empty(),
			errors,
		}
	}
}

/// Validation results for one collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
	/// Collection name.
	pub collection: String,

	/// Number of documents sampled for the schema check.
	pub documents_sampled: usize,

	/// Shape-conformance outcome over the sample.
	pub schema_validation: CheckOutcome,

	/// Index presence/signature and uniqueness outcome.
	pub index_validation: CheckOutcome,
}

impl CollectionReport {
	/// Whether both aspects passed.
	pub fn passed(&self) -> bool {
		self.schema_validation.passed && self.index_validation.passed
	}

	/// Total number of errors across both aspects.
	pub fn error_count(&self) -> usize {
		self.schema_validation.errors.len() + self.index_validation.errors.len()
	}
}

/// Aggregated totals across all collections.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
	/// Number of collections validated.
	pub total_collections: usize,

	/// Collections whose schema validation passed.
	pub schema_passed: usize,

	/// Collections whose index validation passed.
	pub index_passed: usize,

	/// Documents sampled across all collections.
	pub total_documents_sampled: usize,

	/// Errors across all collections and aspects.
	pub total_validation_errors: usize,

	/// Logical AND of every collection's combined pass/fail.
	pub overall_success: bool,
}

/// Full validation report: per-collection detail plus the summary.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
	/// Per-collection results, in schema declaration order.
	pub collections: Vec<CollectionReport>,

	/// Aggregated totals.
	pub summary: ValidationSummary,
}

impl ValidationReport {
	/// Builds a report, computing the summary from the collection entries.
	pub fn from_collections(collections: Vec<CollectionReport>) -> Self {
		let summary = ValidationSummary {
			total_collections: collections.len(),
			schema_passed: collections
				.iter()
				.filter(|c| c.schema_validation.passed)
				.count(),
			index_passed: collections
				.iter()
				.filter(|c| c.index_validation.passed)
				.count(),
			total_documents_sampled: collections.iter().map(|c| c.documents_sampled).sum(),
			total_validation_errors: collections.iter().map(CollectionReport::error_count).sum(),
			overall_success: collections.iter().all(CollectionReport::passed),
		};
		Self {
			collections,
			summary,
		}
	}

	/// Looks up one collection's report.
	pub fn collection(&self, name: &str) -> Option<&CollectionReport> {
		self.collections.iter().find(|c| c.collection == name)
	}
}

impl std::fmt::Display for ValidationReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for report in &self.collections {
			writeln!(
				f,
				"{}: schema {} ({} sampled), indexes {}",
				report.collection,
				if report.schema_validation.passed { "ok" } else { "FAILED" },
				report.documents_sampled,
				if report.index_validation.passed { "ok" } else { "FAILED" },
			)?;
			for error in &report.schema_validation.errors {
				writeln!(f, "  - {error}")?;
			}
			for error in &report.index_validation.errors {
				writeln!(f, "  - {error}")?;
			}
		}
		write!(
			f,
			"{}/{} collections passed, {} documents sampled, {} error(s): {}",
			self.collections.iter().filter(|c| c.passed()).count(),
			self.summary.total_collections,
			self.summary.total_documents_sampled,
			self.summary.total_validation_errors,
			if self.summary.overall_success {
				"validation passed"
			} else {
				"validation FAILED"
			},
		)
	}
}
