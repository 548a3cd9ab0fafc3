//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use mimoid_seeding::prelude::*;
//!
//! let seeder = MongoSeeder::new(backend, schema, SeederConfig::default())?;
//! ```

// Error types
pub use crate::error::{SeedingError, SeedingResult};

// Configuration
pub use crate::config::{GeneratorConfig, SeederConfig};

// Components
pub use crate::generator::DocumentGenerator;
pub use crate::indexes::IndexManager;
pub use crate::loader::{BulkLoader, LoadOutcome};
pub use crate::pools::IdentifierPools;
pub use crate::validator::Validator;

// Reports
pub use crate::report::{CheckOutcome, CollectionReport, ValidationReport, ValidationSummary};

// Lifecycle
pub use crate::seeder::{
	CollectionSeedResult, DatabaseSeeder, MongoSeeder, SeedSummary, seed_database,
};
