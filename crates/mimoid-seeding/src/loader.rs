//! Bulk loading of generated documents.

use bson::Document;

use mimoid_db::{InsertManyOutcome, MongoBackend};

use crate::error::{SeedingError, SeedingResult};

/// Outcome of loading one collection.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
	/// Documents submitted for loading.
	pub requested: u64,

	/// Documents actually persisted.
	pub inserted: u64,

	/// Documents dropped because of duplicate-key violations.
	pub duplicates_skipped: u64,

	/// Positions (within the submitted sequence) of the dropped documents.
	pub skipped_positions: Vec<usize>,
}

/// Persists generated documents in batches.
///
/// A duplicate-key violation on an individual document is logged and skipped
/// while the rest of its batch commits. Anything else aborts the load with a
/// fatal [`SeedingError::Load`]; earlier batches are not rolled back
/// (at-least-once semantics — re-runs should clear first).
pub struct BulkLoader<'a> {
	backend: &'a MongoBackend,
	batch_size: usize,
}

impl<'a> BulkLoader<'a> {
	/// Creates a loader writing through the given backend.
	pub fn new(backend: &'a MongoBackend, batch_size: usize) -> Self {
		Self {
			backend,
			batch_size: batch_size.max(1),
		}
	}

	/// Loads the documents into the collection, in batches.
	pub async fn load(
		&self,
		collection: &str,
		documents: Vec<Document>,
	) -> SeedingResult<LoadOutcome> {
		let mut outcome = LoadOutcome {
			requested: documents.len() as u64,
			..LoadOutcome::default()
		};

		for (batch_index, batch) in documents.chunks(self.batch_size).enumerate() {
			let offset = batch_index * self.batch_size;
			let batch_outcome = self
				.backend
				.insert_many(collection, batch.to_vec())
				.await
				.map_err(|e| SeedingError::Load {
					collection: collection.to_string(),
					message: e.to_string(),
				})?;

			for duplicate in &batch_outcome.duplicates {
				tracing::warn!(
					collection,
					position = offset + duplicate.index,
					key = %duplicate.message,
					"skipped document with duplicate key"
				);
			}
			absorb_batch(&mut outcome, offset, batch_outcome);
		}

		tracing::info!(
			collection,
			inserted = outcome.inserted,
			duplicates_skipped = outcome.duplicates_skipped,
			"bulk load finished"
		);
		Ok(outcome)
	}
}

/// Folds one batch's outcome into the running total.
fn absorb_batch(outcome: &mut LoadOutcome, offset: usize, batch: InsertManyOutcome) {
	outcome.inserted += batch.inserted;
	outcome.duplicates_skipped += batch.duplicates.len() as u64;
	outcome
		.skipped_positions
		.extend(batch.duplicates.into_iter().map(|d| offset + d.index));
}

#[cfg(test)]
mod tests {
	use super::*;
	use mimoid_db::DuplicateKey;
	use rstest::rstest;

	fn duplicate(index: usize) -> DuplicateKey {
		DuplicateKey {
			index,
			message: format!("E11000 duplicate key at {index}"),
		}
	}

	#[rstest]
	fn test_absorb_batch_accumulates() {
		let mut outcome = LoadOutcome {
			requested: 2500,
			..LoadOutcome::default()
		};

		absorb_batch(
			&mut outcome,
			0,
			InsertManyOutcome {
				inserted: 998,
				duplicates: vec![duplicate(3), duplicate(700)],
			},
		);
		absorb_batch(
			&mut outcome,
			1000,
			InsertManyOutcome {
				inserted: 1000,
				duplicates: vec![],
			},
		);
		absorb_batch(
			&mut outcome,
			2000,
			InsertManyOutcome {
				inserted: 499,
				duplicates: vec![duplicate(12)],
			},
		);

		assert_eq!(outcome.inserted, 2497);
		assert_eq!(outcome.duplicates_skipped, 3);
		assert_eq!(outcome.skipped_positions, vec![3, 700, 2012]);
	}

	#[rstest]
	fn test_skipped_positions_are_offset_by_batch() {
		let mut outcome = LoadOutcome::default();
		absorb_batch(
			&mut outcome,
			3000,
			InsertManyOutcome {
				inserted: 999,
				duplicates: vec![duplicate(42)],
			},
		);
		assert_eq!(outcome.skipped_positions, vec![3042]);
	}
}
