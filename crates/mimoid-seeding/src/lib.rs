//! Schema-driven data generation, bulk loading, and validation for MongoDB.
//!
//! This crate is the working half of the Mimoid harness: given a declarative
//! [`DatabaseSchema`](mimoid_schema::DatabaseSchema), it populates a database
//! with generated documents that preserve cross-collection references,
//! creates the declared indexes, and validates the result into a structured
//! report.
//!
//! # Lifecycle
//!
//! Callers drive the four lifecycle operations of [`DatabaseSeeder`] in
//! order:
//!
//! ```ignore
//! use mimoid_seeding::prelude::*;
//!
//! let mut seeder = MongoSeeder::new(backend, schema, SeederConfig::default())?;
//! seeder.clear_database().await?;
//! seeder.seed_all_collections(&counts).await?;
//! seeder.create_indexes().await?;
//! let report = seeder.validate_seed_data().await?;
//! assert!(report.summary.overall_success);
//! ```
//!
//! or run the whole thing with [`seed_database`].
//!
//! # Architecture
//!
//! - [`DocumentGenerator`](generator::DocumentGenerator) - synthesizes
//!   documents per collection, honoring constraints and identifier pools
//! - [`BulkLoader`](loader::BulkLoader) - batched inserts with
//!   duplicate-key skip-and-continue
//! - [`IndexManager`](indexes::IndexManager) - creates declared indexes,
//!   failing loudly on option conflicts
//! - [`Validator`](validator::Validator) - samples documents against the
//!   shape and checks index presence and uniqueness
//! - [`MongoSeeder`](seeder::MongoSeeder) - ties the above together behind
//!   the [`DatabaseSeeder`](seeder::DatabaseSeeder) trait
//!
//! Generation is strictly sequential in schema declaration order: a
//! collection's identifier pool is published once, after its load completes,
//! and is read-only to every later collection. That ordering is what makes
//! referential integrity cheap to guarantee.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod generator;
pub mod indexes;
pub mod loader;
pub mod pools;
pub mod prelude;
pub mod report;
pub mod seeder;
pub mod validator;

// Re-export commonly used types at crate root
pub use config::{GeneratorConfig, SeederConfig};
pub use error::{SeedingError, SeedingResult};
pub use generator::DocumentGenerator;
pub use loader::{BulkLoader, LoadOutcome};
pub use pools::IdentifierPools;
pub use report::{CheckOutcome, CollectionReport, ValidationReport, ValidationSummary};
pub use seeder::{DatabaseSeeder, MongoSeeder, SeedSummary, seed_database};
