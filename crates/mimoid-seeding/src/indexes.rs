//! Index creation from schema definitions.

use bson::{Bson, Document};

use mimoid_db::{DbError, IndexSpec, MongoBackend};
use mimoid_schema::{CollectionSchema, IndexDefinition};

use crate::error::{SeedingError, SeedingResult};

/// Ensures every declared index exists on its collection.
///
/// Runs only after bulk loading completes, so a unique-index build over data
/// that already violates uniqueness fails loudly instead of silently
/// dropping rows.
pub struct IndexManager<'a> {
	backend: &'a MongoBackend,
}

impl<'a> IndexManager<'a> {
	/// Creates an index manager writing through the given backend.
	pub fn new(backend: &'a MongoBackend) -> Self {
		Self { backend }
	}

	/// Creates every index the collection schema declares.
	///
	/// An index that already exists with an identical signature is a no-op.
	/// An index with the same name but a different signature is a fatal
	/// [`SeedingError::IndexConflict`]; it is never silently overwritten.
	pub async fn ensure_indexes(&self, schema: &CollectionSchema) -> SeedingResult<()> {
		if schema.indexes.is_empty() {
			return Ok(());
		}

		let existing = self.backend.list_indexes(&schema.name).await?;

		for definition in &schema.indexes {
			if let Some(present) = existing.iter().find(|spec| spec.name == definition.name) {
				if signature_matches(present, definition) {
					tracing::debug!(
						collection = %schema.name,
						index = %definition.name,
						"index already exists with identical options"
					);
					continue;
				}
				return Err(SeedingError::IndexConflict {
					collection: schema.name.clone(),
					index: definition.name.clone(),
					message: describe_conflict(present, definition),
				});
			}

			match self
				.backend
				.create_index(
					&schema.name,
					definition.keys_document(),
					&definition.name,
					definition.unique,
					definition.sparse,
				)
				.await
			{
				Ok(()) => {}
				Err(DbError::IndexConflict(message)) => {
					return Err(SeedingError::IndexConflict {
						collection: schema.name.clone(),
						index: definition.name.clone(),
						message,
					});
				}
				Err(other) => return Err(other.into()),
			}
		}

		Ok(())
	}
}

/// Whether a server-reported index matches a declared definition by keys,
/// uniqueness, and sparseness.
pub(crate) fn signature_matches(spec: &IndexSpec, definition: &IndexDefinition) -> bool {
	normalize_keys(&spec.keys) == normalize_keys(&definition.keys_document())
		&& spec.unique == definition.unique
		&& spec.sparse == definition.sparse
}

/// Canonical key form for comparison. The server may report numeric
/// directions as int32, int64, or double depending on how the index was
/// created.
fn normalize_keys(keys: &Document) -> Vec<(String, String)> {
	keys.iter()
		.map(|(field, value)| {
			let direction = match value {
				Bson::Int32(n) => n.to_string(),
				Bson::Int64(n) => n.to_string(),
				Bson::Double(n) => (*n as i64).to_string(),
				Bson::String(s) => s.clone(),
				other => format!("{other:?}"),
			};
			(field.clone(), direction)
		})
		.collect()
}

fn describe_conflict(present: &IndexSpec, definition: &IndexDefinition) -> String {
	let mut differences = Vec::new();
	if normalize_keys(&present.keys) != normalize_keys(&definition.keys_document()) {
		differences.push(format!(
			"declared keys {} but existing keys {}",
			definition.keys_document(),
			present.keys
		));
	}
	if present.unique != definition.unique {
		differences.push(format!(
			"declared unique={} but existing index is unique={}",
			definition.unique, present.unique
		));
	}
	if present.sparse != definition.sparse {
		differences.push(format!(
			"declared sparse={} but existing index is sparse={}",
			definition.sparse, present.sparse
		));
	}
	differences.join("; ")
}
