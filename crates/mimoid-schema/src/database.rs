//! Database-level schema: ordered collections plus structural self-checks.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::collection::CollectionSchema;
use crate::error::SchemaDefinitionError;
use crate::field::{FieldSchema, FieldType};

/// Declarative description of a whole database.
///
/// The collection list is **ordered**: declaration order is the seeding
/// dependency order, and [`DatabaseSchema::validate`] rejects reference
/// fields that point forward in the list. Created once when the technical
/// design is finalized and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
	/// Database name.
	pub name: String,

	/// Human-readable description.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub description: String,

	/// Collections in dependency order.
	pub collections: Vec<CollectionSchema>,
}

impl DatabaseSchema {
	/// Creates a schema from an ordered list of collections.
	pub fn new(name: impl Into<String>, collections: Vec<CollectionSchema>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			collections,
		}
	}

	/// Looks up a collection by name.
	pub fn collection(&self, name: &str) -> Option<&CollectionSchema> {
		self.collections.iter().find(|c| c.name == name)
	}

	/// Collection names in declaration order.
	pub fn collection_names(&self) -> Vec<&str> {
		self.collections.iter().map(|c| c.name.as_str()).collect()
	}

	/// Names of the collections the given collection's reference fields
	/// point at.
	pub fn dependencies_of(&self, name: &str) -> Vec<String> {
		self.collection(name)
			.map(CollectionSchema::dependencies)
			.unwrap_or_default()
	}

	/// Performs the structural self-check.
	///
	/// Collects **every** violation found rather than stopping at the first:
	/// duplicate collection names, duplicate index names within a collection,
	/// index keys referencing fields absent from the shape, references to
	/// unknown or later-declared collections, empty enum value sets,
	/// inverted bounds, and invalid regex patterns.
	pub fn validate(&self) -> Result<(), SchemaDefinitionError> {
		let mut violations = Vec::new();

		let mut seen = HashSet::new();
		for collection in &self.collections {
			if !seen.insert(collection.name.as_str()) {
				violations.push(format!("duplicate collection name '{}'", collection.name));
			}
		}

		// Collections visible to reference fields of the collection being
		// checked: everything declared strictly earlier, plus itself
		// (self-references such as a parent pointer are legal).
		let mut declared: HashSet<&str> = HashSet::new();
		for collection in &self.collections {
			declared.insert(collection.name.as_str());
			check_collection(collection, &declared, &mut violations);
		}

		if violations.is_empty() {
			Ok(())
		} else {
			Err(SchemaDefinitionError::new(violations))
		}
	}
}

fn check_collection(
	collection: &CollectionSchema,
	declared: &HashSet<&str>,
	violations: &mut Vec<String>,
) {
	let mut index_names = HashSet::new();
	for index in &collection.indexes {
		if !index_names.insert(index.name.as_str()) {
			violations.push(format!(
				"collection '{}': duplicate index name '{}'",
				collection.name, index.name
			));
		}
		if index.keys.is_empty() {
			violations.push(format!(
				"collection '{}': index '{}' has no keys",
				collection.name, index.name
			));
		}
		for key in &index.keys {
			if collection.resolve_field(&key.field).is_none() {
				violations.push(format!(
					"collection '{}': index '{}' references unknown field '{}'",
					collection.name, index.name, key.field
				));
			}
		}
	}

	for (name, field) in &collection.fields {
		check_field(&collection.name, name, field, declared, violations);
	}
}

fn check_field(
	collection: &str,
	path: &str,
	field: &FieldSchema,
	declared: &HashSet<&str>,
	violations: &mut Vec<String>,
) {
	match &field.field_type {
		FieldType::String {
			min_length,
			max_length,
			pattern,
		} => {
			if let (Some(min), Some(max)) = (min_length, max_length) {
				if min > max {
					violations.push(format!(
						"collection '{collection}': field '{path}' has min_length {min} > max_length {max}"
					));
				}
			}
			if let Some(pattern) = pattern {
				if Regex::new(pattern).is_err() {
					violations.push(format!(
						"collection '{collection}': field '{path}' has invalid pattern '{pattern}'"
					));
				}
			}
		}
		FieldType::Int { min, max } => {
			if let (Some(min), Some(max)) = (min, max) {
				if min > max {
					violations.push(format!(
						"collection '{collection}': field '{path}' has min {min} > max {max}"
					));
				}
			}
		}
		FieldType::Float { min, max } => {
			if let (Some(min), Some(max)) = (min, max) {
				if min > max {
					violations.push(format!(
						"collection '{collection}': field '{path}' has min {min} > max {max}"
					));
				}
			}
		}
		FieldType::Enum { values } => {
			if values.is_empty() {
				violations.push(format!(
					"collection '{collection}': field '{path}' has an empty enum value set"
				));
			}
		}
		FieldType::Array {
			items,
			min_items,
			max_items,
		} => {
			if let (Some(min), Some(max)) = (min_items, max_items) {
				if min > max {
					violations.push(format!(
						"collection '{collection}': field '{path}' has min_items {min} > max_items {max}"
					));
				}
			}
			check_field(collection, &format!("{path}[]"), items, declared, violations);
		}
		FieldType::Document { fields } => {
			for (name, nested) in fields {
				check_field(
					collection,
					&format!("{path}.{name}"),
					nested,
					declared,
					violations,
				);
			}
		}
		FieldType::Reference { collection: target } => {
			if !declared.contains(target.as_str()) {
				violations.push(format!(
					"collection '{collection}': field '{path}' references collection '{target}' \
					 which is not declared earlier in the schema"
				));
			}
		}
		FieldType::Bool | FieldType::DateTime | FieldType::ObjectId => {}
	}
}
