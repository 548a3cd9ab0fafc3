//! # Mimoid
//!
//! A schema-driven MongoDB seeding and validation harness.
//!
//! Mimoid takes a declarative database schema — collections, document
//! shapes, index definitions — and turns it into a populated database:
//! synthetic documents with realistic distributions and intact
//! cross-collection references, the declared indexes, and a structured
//! validation report comparing what landed in the store against what was
//! declared.
//!
//! ## Crates
//!
//! - [`schema`](mimoid_schema) - the declarative schema model and its
//!   structural self-checks
//! - [`db`](mimoid_db) - MongoDB connection handling and store primitives
//! - [`seeding`](mimoid_seeding) - document generation, bulk loading, index
//!   creation, validation, and the seeder lifecycle
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use mimoid::prelude::*;
//!
//! let schema: DatabaseSchema = serde_json::from_str(schema_json)?;
//! let backend = MongoBackend::connect("mongodb://localhost:27017")
//!     .await?
//!     .with_database(&schema.name);
//!
//! let report = seed_database(backend, schema, SeederConfig::default(), &counts).await?;
//! assert!(report.summary.overall_success);
//! ```
//!
//! The `mimoid-seed` binary (from `mimoid-cli`) wraps the same lifecycle for
//! shell use.

pub use mimoid_db as db;
pub use mimoid_schema as schema;
pub use mimoid_seeding as seeding;

/// Convenience re-exports for common usage.
pub mod prelude {
	pub use mimoid_db::{DbError, DbResult, MongoBackend, MongoBackendBuilder};
	pub use mimoid_schema::{
		CollectionSchema, DatabaseSchema, FieldSchema, FieldType, IndexDefinition, IndexKey,
		IndexKind, SchemaDefinitionError,
	};
	pub use mimoid_seeding::prelude::*;
}
