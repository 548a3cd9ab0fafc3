//! Seeder lifecycle: the `DatabaseSeeder` trait and its schema-driven
//! implementation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use bson::oid::ObjectId;

use mimoid_db::MongoBackend;
use mimoid_schema::DatabaseSchema;

use crate::config::SeederConfig;
use crate::error::{SeedingError, SeedingResult};
use crate::generator::DocumentGenerator;
use crate::indexes::IndexManager;
use crate::loader::BulkLoader;
use crate::pools::IdentifierPools;
use crate::report::ValidationReport;
use crate::validator::Validator;

/// Per-collection result of a seeding pass.
#[derive(Debug, Clone)]
pub struct CollectionSeedResult {
	/// Collection name.
	pub collection: String,

	/// Documents requested.
	pub requested: u64,

	/// Documents persisted.
	pub inserted: u64,

	/// Documents dropped because of duplicate keys.
	pub duplicates_skipped: u64,
}

/// Summary of a whole seeding pass, in collection order.
#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
	/// Per-collection results.
	pub collections: Vec<CollectionSeedResult>,
}

impl SeedSummary {
	/// Total documents persisted across all collections.
	pub fn total_inserted(&self) -> u64 {
		self.collections.iter().map(|c| c.inserted).sum()
	}
}

impl std::fmt::Display for SeedSummary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for result in &self.collections {
			writeln!(
				f,
				"{}: {}/{} inserted ({} duplicates skipped)",
				result.collection, result.inserted, result.requested, result.duplicates_skipped
			)?;
		}
		write!(f, "total: {} documents", self.total_inserted())
	}
}

/// The seeding lifecycle, in required call order: clear, seed, index,
/// validate.
///
/// Implementations may generate data however they like but must preserve
/// this four-call contract. The schema-driven implementation is
/// [`MongoSeeder`]; per-project seeders are alternative implementations of
/// this trait, selected by the caller.
#[async_trait]
pub trait DatabaseSeeder {
	/// The schema this seeder populates.
	fn schema(&self) -> &DatabaseSchema;

	/// Drops every collection named in the schema. Idempotent; safe to call
	/// against a database that does not exist.
	async fn clear_database(&self) -> SeedingResult<()>;

	/// Generates and loads every collection in dependency order,
	/// accumulating identifier pools for downstream collections.
	///
	/// `counts` maps collection name to target record count; collections
	/// without an entry get an implementation-defined default.
	async fn seed_all_collections(
		&mut self,
		counts: &HashMap<String, u64>,
	) -> SeedingResult<SeedSummary>;

	/// Creates every index the schema declares.
	async fn create_indexes(&self) -> SeedingResult<()>;

	/// Validates seeded data with an explicit per-collection sample size.
	async fn validate_schema_and_indexes(
		&self,
		sample_size: usize,
	) -> SeedingResult<ValidationReport>;

	/// Validates seeded data with the default sample size.
	async fn validate_seed_data(&self) -> SeedingResult<ValidationReport> {
		self.validate_schema_and_indexes(10).await
	}
}

/// Schema-driven seeder: generates documents from the declarative schema and
/// drives the generator, loader, index manager, and validator through one
/// backend handle.
pub struct MongoSeeder {
	backend: MongoBackend,
	schema: DatabaseSchema,
	config: SeederConfig,
	generator: DocumentGenerator,
	pools: IdentifierPools,
}

impl MongoSeeder {
	/// Creates a seeder, validating the schema up front.
	///
	/// An inconsistent schema is a startup-time fatal error; nothing touches
	/// the store before the schema passes its self-check.
	pub fn new(
		backend: MongoBackend,
		schema: DatabaseSchema,
		config: SeederConfig,
	) -> SeedingResult<Self> {
		schema.validate()?;
		let generator = DocumentGenerator::new(config.generator.clone());
		Ok(Self {
			backend,
			schema,
			config,
			generator,
			pools: IdentifierPools::new(),
		})
	}

	/// The identifier pools accumulated so far.
	pub fn identifier_pools(&self) -> &IdentifierPools {
		&self.pools
	}

	/// Per-collection document counts, for post-seed summaries.
	pub async fn collection_counts(&self) -> SeedingResult<Vec<(String, u64)>> {
		let mut counts = Vec::with_capacity(self.schema.collections.len());
		for collection in &self.schema.collections {
			let count = self.backend.count_documents(&collection.name).await?;
			counts.push((collection.name.clone(), count));
		}
		Ok(counts)
	}
}

#[async_trait]
impl DatabaseSeeder for MongoSeeder {
	fn schema(&self) -> &DatabaseSchema {
		&self.schema
	}

	async fn clear_database(&self) -> SeedingResult<()> {
		for collection in &self.schema.collections {
			self.backend.drop_collection(&collection.name).await?;
		}
		tracing::info!(
			database = self.backend.database_name(),
			collections = self.schema.collections.len(),
			"cleared database"
		);
		Ok(())
	}

	async fn seed_all_collections(
		&mut self,
		counts: &HashMap<String, u64>,
	) -> SeedingResult<SeedSummary> {
		for name in counts.keys() {
			if self.schema.collection(name).is_none() {
				return Err(SeedingError::UnknownCollection(name.clone()));
			}
		}

		let mut summary = SeedSummary::default();
		let loader = BulkLoader::new(&self.backend, self.config.batch_size);

		for collection in &self.schema.collections {
			let count = counts
				.get(&collection.name)
				.copied()
				.unwrap_or(self.config.default_count);
			tracing::info!(collection = %collection.name, count, "seeding collection");

			let documents = self.generator.generate(collection, count, &self.pools)?;
			let ids: Vec<ObjectId> = documents
				.iter()
				.filter_map(|d| d.get_object_id("_id").ok())
				.collect();

			let outcome = loader.load(&collection.name, documents).await?;

			// Documents skipped as duplicates never made it into the store,
			// so their ids must not enter the pool.
			let skipped: HashSet<usize> = outcome.skipped_positions.iter().copied().collect();
			let loaded_ids: Vec<ObjectId> = ids
				.into_iter()
				.enumerate()
				.filter(|(position, _)| !skipped.contains(position))
				.map(|(_, id)| id)
				.collect();
			self.pools.publish(collection.name.clone(), loaded_ids);

			summary.collections.push(CollectionSeedResult {
				collection: collection.name.clone(),
				requested: outcome.requested,
				inserted: outcome.inserted,
				duplicates_skipped: outcome.duplicates_skipped,
			});
		}

		Ok(summary)
	}

	async fn create_indexes(&self) -> SeedingResult<()> {
		let manager = IndexManager::new(&self.backend);
		for collection in &self.schema.collections {
			manager.ensure_indexes(collection).await?;
		}
		tracing::info!("created indexes");
		Ok(())
	}

	async fn validate_schema_and_indexes(
		&self,
		sample_size: usize,
	) -> SeedingResult<ValidationReport> {
		let validator = Validator::new(&self.backend, sample_size);
		Ok(validator.validate(&self.schema).await)
	}

	async fn validate_seed_data(&self) -> SeedingResult<ValidationReport> {
		self.validate_schema_and_indexes(self.config.sample_size).await
	}
}

/// Runs the full lifecycle — clear, seed, index, validate — and returns the
/// validation report. The caller decides how to treat a failing report;
/// fatal errors abort with `Err` instead.
pub async fn seed_database(
	backend: MongoBackend,
	schema: DatabaseSchema,
	config: SeederConfig,
	counts: &HashMap<String, u64>,
) -> SeedingResult<ValidationReport> {
	let mut seeder = MongoSeeder::new(backend, schema, config)?;

	seeder.clear_database().await?;
	let summary = seeder.seed_all_collections(counts).await?;
	tracing::info!(total_inserted = summary.total_inserted(), "seeding finished");
	seeder.create_indexes().await?;
	seeder.validate_seed_data().await
}
