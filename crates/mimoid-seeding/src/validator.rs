//! Post-seed validation: schema conformance and index behavior.

use std::collections::HashSet;

use bson::{Bson, doc, Document};

use mimoid_db::MongoBackend;
use mimoid_schema::{CollectionSchema, DatabaseSchema, IndexDefinition};

use crate::indexes::signature_matches;
use crate::report::{CheckOutcome, CollectionReport, ValidationReport};

/// Confirms seeded data structurally and operationally matches the schema.
///
/// Each collection progresses through its schema check and then its index
/// check, with no retries; a failure is recorded in the report and the run
/// continues, so every collection is always visited. Store errors during
/// validation become report errors rather than aborting the run — the caller
/// always receives a complete report.
pub struct Validator<'a> {
	backend: &'a MongoBackend,
	sample_size: usize,
}

impl<'a> Validator<'a> {
	/// Creates a validator sampling up to `sample_size` documents per
	/// collection.
	pub fn new(backend: &'a MongoBackend, sample_size: usize) -> Self {
		Self {
			backend,
			sample_size: sample_size.max(1),
		}
	}

	/// Validates every collection in the schema and aggregates the report.
	pub async fn validate(&self, schema: &DatabaseSchema) -> ValidationReport {
		// Existence is checked against one listing; if even that fails the
		// per-collection checks will record their own errors.
		let known: Option<HashSet<String>> = match self.backend.list_collection_names().await {
			Ok(names) => Some(names.into_iter().collect()),
			Err(error) => {
				tracing::warn!(%error, "could not list collections");
				None
			}
		};

		let mut reports = Vec::with_capacity(schema.collections.len());
		for collection in &schema.collections {
			reports.push(self.validate_collection(collection, known.as_ref()).await);
		}
		ValidationReport::from_collections(reports)
	}

	async fn validate_collection(
		&self,
		schema: &CollectionSchema,
		known: Option<&HashSet<String>>,
	) -> CollectionReport {
		let mut schema_errors = Vec::new();
		let mut documents_sampled = 0;

		if let Some(known) = known {
			if !known.contains(&schema.name) {
				schema_errors.push(format!("collection '{}' does not exist", schema.name));
			}
		}

		tracing::debug!(collection = %schema.name, phase = "schema", "validating");
		match self
			.backend
			.find_sample(&schema.name, self.sample_size as i64)
			.await
		{
			Ok(documents) => {
				documents_sampled = documents.len();
				for (ordinal, document) in documents.iter().enumerate() {
					for error in schema.check_document(document) {
						schema_errors.push(format!("document {ordinal}: {error}"));
					}
				}
			}
			Err(error) => {
				schema_errors.push(format!("failed to sample documents: {error}"));
			}
		}

		tracing::debug!(collection = %schema.name, phase = "indexes", "validating");
		let mut index_errors = Vec::new();
		match self.backend.list_indexes(&schema.name).await {
			Ok(existing) => {
				for definition in &schema.indexes {
					match existing.iter().find(|spec| spec.name == definition.name) {
						None => {
							index_errors.push(format!("index '{}' not found", definition.name));
						}
						Some(spec) if !signature_matches(spec, definition) => {
							index_errors.push(format!(
								"index '{}' exists with a different signature",
								definition.name
							));
						}
						Some(_) => {}
					}
					// The duplicate check runs even when the index is
					// missing: data violating a declared uniqueness
					// contract is an error regardless of what got built.
					if definition.unique {
						self.check_unique(schema, definition, &mut index_errors)
							.await;
					}
				}
			}
			Err(error) => {
				index_errors.push(format!("failed to list indexes: {error}"));
			}
		}

		CollectionReport {
			collection: schema.name.clone(),
			documents_sampled,
			schema_validation: CheckOutcome::from_errors(schema_errors),
			index_validation: CheckOutcome::from_errors(index_errors),
		}
	}

	/// Runs the full-collection duplicate check for a unique index. The
	/// whole collection is grouped, not just the sample.
	async fn check_unique(
		&self,
		schema: &CollectionSchema,
		definition: &IndexDefinition,
		errors: &mut Vec<String>,
	) {
		let pipeline = duplicate_pipeline(definition);
		match self.backend.aggregate(&schema.name, pipeline).await {
			Ok(groups) => {
				for group in groups {
					let key = group
						.get_document("_id")
						.map(|d| d.to_string())
						.unwrap_or_else(|_| "<unknown>".to_string());
					let count = match group.get("count") {
						Some(Bson::Int32(n)) => i64::from(*n),
						Some(Bson::Int64(n)) => *n,
						_ => 0,
					};
					errors.push(format!(
						"unique index '{}' violated by value {key}: {count} documents",
						definition.name
					));
				}
			}
			Err(error) => {
				errors.push(format!(
					"failed to check uniqueness for index '{}': {error}",
					definition.name
				));
			}
		}
	}
}

/// Builds the duplicate-detection pipeline for a unique index: group the
/// full collection by the indexed field(s) and keep groups with more than
/// one member. Sparse indexes exclude documents missing the indexed fields,
/// so the pipeline does too.
pub(crate) fn duplicate_pipeline(definition: &IndexDefinition) -> Vec<Document> {
	let mut pipeline = Vec::new();

	if definition.sparse {
		let mut presence = Document::new();
		for key in &definition.keys {
			presence.insert(key.field.clone(), doc! { "$exists": true });
		}
		pipeline.push(doc! { "$match": presence });
	}

	let mut group_id = Document::new();
	for key in &definition.keys {
		// Dots are path separators inside $group keys, so flatten them.
		group_id.insert(key.field.replace('.', "_"), format!("${}", key.field));
	}

	pipeline.push(doc! { "$group": { "_id": group_id, "count": { "$sum": 1 } } });
	pipeline.push(doc! { "$match": { "count": { "$gt": 1 } } });
	pipeline
}
