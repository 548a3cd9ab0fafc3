//! MongoDB connection and store primitives.
//!
//! [`MongoBackend`] wraps a pooled client plus a database name and exposes
//! exactly the operations the seeding harness needs: drop-collection,
//! bulk-insert, create-index, sampled find, count, and aggregation. The
//! backend is passed explicitly to every component that needs it; there is no
//! ambient client state.
//!
//! # Example
//!
//! ```rust,no_run
//! use mimoid_db::MongoBackend;
//! use bson::doc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MongoBackend::connect("mongodb://localhost:27017")
//!     .await?
//!     .with_database("shop");
//!
//! backend.health_check().await?;
//! let outcome = backend
//!     .insert_many("users", vec![doc! { "email": "alice@example.com" }])
//!     .await?;
//! assert_eq!(outcome.inserted, 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use bson::{doc, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};

use crate::error::{DbError, DbResult};
use crate::types::{DuplicateKey, IndexSpec, InsertManyOutcome};

/// Server error code for a duplicate key violation.
const DUPLICATE_KEY: i32 = 11000;

/// Server error code for dropping a namespace that does not exist.
const NAMESPACE_NOT_FOUND: i32 = 26;

/// MongoDB backend: pooled client plus target database name.
#[derive(Clone)]
pub struct MongoBackend {
	client: Arc<Client>,
	database_name: String,
}

/// Builder for configuring MongoDB connections.
///
/// # Example
///
/// ```rust,no_run
/// use mimoid_db::MongoBackendBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MongoBackendBuilder::new()
///     .url("mongodb://localhost:27017")
///     .database("shop")
///     .max_pool_size(50)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct MongoBackendBuilder {
	url: String,
	database: String,
	max_pool_size: Option<u32>,
	min_pool_size: Option<u32>,
	max_idle_time_secs: Option<u64>,
}

impl Default for MongoBackendBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl MongoBackendBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			url: "mongodb://localhost:27017".to_string(),
			database: "test".to_string(),
			max_pool_size: None,
			min_pool_size: None,
			max_idle_time_secs: None,
		}
	}

	/// Sets the MongoDB connection URL.
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = url.into();
		self
	}

	/// Sets the database name.
	pub fn database(mut self, database: impl Into<String>) -> Self {
		self.database = database.into();
		self
	}

	/// Sets the maximum connection pool size.
	pub fn max_pool_size(mut self, size: u32) -> Self {
		self.max_pool_size = Some(size);
		self
	}

	/// Sets the minimum connection pool size.
	pub fn min_pool_size(mut self, size: u32) -> Self {
		self.min_pool_size = Some(size);
		self
	}

	/// Sets the maximum idle time for pooled connections in seconds.
	pub fn max_idle_time_secs(mut self, secs: u64) -> Self {
		self.max_idle_time_secs = Some(secs);
		self
	}

	/// Builds the backend.
	pub async fn build(self) -> DbResult<MongoBackend> {
		let mut options = ClientOptions::parse(&self.url)
			.await
			.map_err(|e| DbError::Configuration(e.to_string()))?;

		if let Some(max_size) = self.max_pool_size {
			options.max_pool_size = Some(max_size);
		}
		if let Some(min_size) = self.min_pool_size {
			options.min_pool_size = Some(min_size);
		}
		if let Some(idle_time) = self.max_idle_time_secs {
			options.max_idle_time = Some(Duration::from_secs(idle_time));
		}

		let client =
			Client::with_options(options).map_err(|e| DbError::Connection(e.to_string()))?;

		Ok(MongoBackend {
			client: Arc::new(client),
			database_name: self.database,
		})
	}
}

impl MongoBackend {
	/// Connects using a connection string.
	///
	/// # Arguments
	///
	/// * `url` - MongoDB connection string (e.g. "mongodb://localhost:27017")
	pub async fn connect(url: &str) -> DbResult<Self> {
		let client = Client::with_uri_str(url)
			.await
			.map_err(|e| DbError::Connection(e.to_string()))?;

		Ok(Self {
			client: Arc::new(client),
			database_name: "test".to_string(),
		})
	}

	/// Creates a builder for configuring the connection.
	pub fn builder() -> MongoBackendBuilder {
		MongoBackendBuilder::new()
	}

	/// Sets the database name to use.
	pub fn with_database(mut self, database_name: &str) -> Self {
		self.database_name = database_name.to_string();
		self
	}

	/// Name of the target database.
	pub fn database_name(&self) -> &str {
		&self.database_name
	}

	/// The underlying database handle.
	pub fn database(&self) -> Database {
		self.client.database(&self.database_name)
	}

	/// Pings the server to confirm connectivity.
	pub async fn health_check(&self) -> DbResult<()> {
		self.database()
			.run_command(doc! { "ping": 1 })
			.await
			.map_err(|e| DbError::Connection(format!("health check failed: {e}")))?;
		Ok(())
	}

	/// Drops a collection. A missing collection is a success.
	pub async fn drop_collection(&self, collection: &str) -> DbResult<()> {
		use mongodb::error::ErrorKind;

		let coll = self.database().collection::<Document>(collection);
		match coll.drop().await {
			Ok(()) => {
				tracing::debug!(collection, "dropped collection");
				Ok(())
			}
			Err(err) => match *err.kind {
				ErrorKind::Command(ref command_error)
					if command_error.code == NAMESPACE_NOT_FOUND =>
				{
					Ok(())
				}
				_ => Err(err.into()),
			},
		}
	}

	/// Inserts documents unordered, classifying per-document duplicate-key
	/// violations into the outcome instead of failing the batch.
	///
	/// Any write failure other than a duplicate key aborts with an error.
	pub async fn insert_many(
		&self,
		collection: &str,
		documents: Vec<Document>,
	) -> DbResult<InsertManyOutcome> {
		use mongodb::error::ErrorKind;

		if documents.is_empty() {
			return Ok(InsertManyOutcome::default());
		}

		let total = documents.len();
		let coll = self.database().collection::<Document>(collection);

		match coll.insert_many(documents).ordered(false).await {
			Ok(result) => Ok(InsertManyOutcome {
				inserted: result.inserted_ids.len() as u64,
				duplicates: Vec::new(),
			}),
			Err(err) => match *err.kind {
				ErrorKind::InsertMany(ref failure) => {
					let write_errors = failure.write_errors.clone().unwrap_or_default();
					let only_duplicates = failure.write_concern_error.is_none()
						&& write_errors.iter().all(|e| e.code == DUPLICATE_KEY);

					if !only_duplicates {
						return Err(DbError::Execution(err.to_string()));
					}

					let duplicates = write_errors
						.into_iter()
						.map(|e| DuplicateKey {
							index: e.index,
							message: e.message,
						})
						.collect::<Vec<_>>();

					Ok(InsertManyOutcome {
						inserted: (total - duplicates.len()) as u64,
						duplicates,
					})
				}
				_ => Err(err.into()),
			},
		}
	}

	/// Fetches up to `limit` documents from a collection.
	pub async fn find_sample(&self, collection: &str, limit: i64) -> DbResult<Vec<Document>> {
		let coll = self.database().collection::<Document>(collection);
		let cursor = coll.find(doc! {}).limit(limit).await?;
		Ok(cursor.try_collect().await?)
	}

	/// Counts all documents in a collection.
	pub async fn count_documents(&self, collection: &str) -> DbResult<u64> {
		let coll = self.database().collection::<Document>(collection);
		Ok(coll.count_documents(doc! {}).await?)
	}

	/// Runs an aggregation pipeline and collects the results.
	pub async fn aggregate(
		&self,
		collection: &str,
		pipeline: Vec<Document>,
	) -> DbResult<Vec<Document>> {
		let coll = self.database().collection::<Document>(collection);
		let cursor = coll.aggregate(pipeline).await?;
		Ok(cursor.try_collect().await?)
	}

	/// Creates an index with the given keys, name, and flags.
	///
	/// Server-side option/spec conflicts surface as
	/// [`DbError::IndexConflict`].
	pub async fn create_index(
		&self,
		collection: &str,
		keys: Document,
		name: &str,
		unique: bool,
		sparse: bool,
	) -> DbResult<()> {
		let coll = self.database().collection::<Document>(collection);
		let options = IndexOptions::builder()
			.name(name.to_string())
			.unique(unique)
			.sparse(sparse)
			.build();
		let model = IndexModel::builder().keys(keys).options(options).build();

		coll.create_index(model).await?;
		tracing::debug!(collection, index = name, "created index");
		Ok(())
	}

	/// Lists the indexes present on a collection.
	///
	/// A missing collection reports no indexes.
	pub async fn list_indexes(&self, collection: &str) -> DbResult<Vec<IndexSpec>> {
		use mongodb::error::ErrorKind;

		let coll = self.database().collection::<Document>(collection);
		let cursor = match coll.list_indexes().await {
			Ok(cursor) => cursor,
			Err(err) => match *err.kind {
				ErrorKind::Command(ref command_error)
					if command_error.code == NAMESPACE_NOT_FOUND =>
				{
					return Ok(Vec::new());
				}
				_ => return Err(err.into()),
			},
		};

		let models: Vec<IndexModel> = cursor.try_collect().await?;
		Ok(models
			.into_iter()
			.map(|model| {
				let (name, unique, sparse) = match model.options {
					Some(options) => (
						options.name.unwrap_or_default(),
						options.unique.unwrap_or(false),
						options.sparse.unwrap_or(false),
					),
					None => (String::new(), false, false),
				};
				IndexSpec {
					name,
					keys: model.keys,
					unique,
					sparse,
				}
			})
			.collect())
	}

	/// Lists the collection names present in the database.
	pub async fn list_collection_names(&self) -> DbResult<Vec<String>> {
		Ok(self.database().list_collection_names().await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_builder_default() {
		let builder = MongoBackendBuilder::new();
		assert_eq!(builder.url, "mongodb://localhost:27017");
		assert_eq!(builder.database, "test");
		assert_eq!(builder.max_pool_size, None);
		assert_eq!(builder.min_pool_size, None);
	}

	#[rstest]
	fn test_builder_configuration() {
		let builder = MongoBackendBuilder::new()
			.url("mongodb://example.com:27017")
			.database("shop")
			.max_pool_size(50)
			.min_pool_size(5)
			.max_idle_time_secs(300);

		assert_eq!(builder.url, "mongodb://example.com:27017");
		assert_eq!(builder.database, "shop");
		assert_eq!(builder.max_pool_size, Some(50));
		assert_eq!(builder.min_pool_size, Some(5));
		assert_eq!(builder.max_idle_time_secs, Some(300));
	}

	#[rstest]
	fn test_backend_builder_method() {
		let builder = MongoBackend::builder();
		assert_eq!(builder.url, "mongodb://localhost:27017");
	}
}
