//! Declarative MongoDB schema model for the Mimoid seeding harness.
//!
//! This crate holds the pure-data side of Mimoid: a serde-deserializable
//! description of a database (collections, document shapes, indexes) together
//! with the structural self-checks and document shape checks the rest of the
//! harness builds on. It performs no I/O.
//!
//! # Quick Start
//!
//! A schema is usually authored upstream as JSON and loaded verbatim:
//!
//! ```
//! use mimoid_schema::DatabaseSchema;
//!
//! let schema: DatabaseSchema = serde_json::from_str(r#"{
//!   "name": "shop",
//!   "collections": [
//!     {
//!       "name": "users",
//!       "fields": {
//!         "email": {"type": "string", "min_length": 5, "max_length": 120},
//!         "active": {"type": "bool", "required": false}
//!       },
//!       "indexes": [
//!         {
//!           "name": "email_unique",
//!           "keys": [{"field": "email", "kind": "ascending"}],
//!           "unique": true
//!         }
//!       ]
//!     }
//!   ]
//! }"#).unwrap();
//!
//! schema.validate().unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`DatabaseSchema`] - named, **ordered** list of collections; declaration
//!   order is the seeding dependency order
//! - [`CollectionSchema`] - one collection's shape and index list, with
//!   [`CollectionSchema::check_document`] for shape validation of stored
//!   documents
//! - [`FieldSchema`] / [`FieldType`] - per-field type and constraints as a
//!   closed sum type
//! - [`IndexDefinition`] / [`IndexKind`] - declarative index descriptions

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod collection;
pub mod database;
pub mod error;
pub mod field;
pub mod index;

pub use collection::CollectionSchema;
pub use database::DatabaseSchema;
pub use error::SchemaDefinitionError;
pub use field::{FieldSchema, FieldType};
pub use index::{IndexDefinition, IndexKey, IndexKind};
