//! Per-collection schema: document shape plus index list.

use bson::{Bson, Document};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::field::{FieldSchema, FieldType};
use crate::index::IndexDefinition;

/// Declarative description of one collection: name, document shape, and
/// index definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
	/// Collection name.
	pub name: String,

	/// Human-readable description.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub description: String,

	/// Field name to shape, in declaration order.
	pub fields: IndexMap<String, FieldSchema>,

	/// Index definitions for this collection.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub indexes: Vec<IndexDefinition>,
}

impl CollectionSchema {
	/// Creates a collection schema with no indexes.
	pub fn new(name: impl Into<String>, fields: IndexMap<String, FieldSchema>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			fields,
			indexes: Vec::new(),
		}
	}

	/// Adds an index definition.
	pub fn with_index(mut self, index: IndexDefinition) -> Self {
		self.indexes.push(index);
		self
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Names of collections this collection's reference fields point at.
	pub fn dependencies(&self) -> Vec<String> {
		let mut out = Vec::new();
		for field in self.fields.values() {
			field.referenced_collections(&mut out);
		}
		out
	}

	/// Resolves a (possibly dotted) field path against the shape.
	///
	/// Dotted paths descend into nested documents; array layers are
	/// transparent, matching MongoDB's multikey path semantics.
	pub fn resolve_field(&self, path: &str) -> Option<&FieldSchema> {
		let mut parts = path.split('.');
		let first = parts.next()?;
		let mut current = self.fields.get(first)?;

		for part in parts {
			// Step through array layers to the element shape.
			let mut shape = current;
			while let FieldType::Array { items, .. } = &shape.field_type {
				shape = items.as_ref();
			}
			match &shape.field_type {
				FieldType::Document { fields } => {
					current = fields.get(part)?;
				}
				_ => return None,
			}
		}
		Some(current)
	}

	/// Checks one stored document against the declared shape.
	///
	/// Returns one error string per violation; an empty result means the
	/// document conforms. Fields not declared in the shape (including `_id`)
	/// are ignored — document stores are open-world.
	pub fn check_document(&self, document: &Document) -> Vec<String> {
		let mut errors = Vec::new();
		check_shape(&self.fields, document, "", &mut errors);
		errors
	}
}

fn check_shape(
	fields: &IndexMap<String, FieldSchema>,
	document: &Document,
	prefix: &str,
	errors: &mut Vec<String>,
) {
	for (name, schema) in fields {
		let path = if prefix.is_empty() {
			name.clone()
		} else {
			format!("{prefix}.{name}")
		};

		match document.get(name) {
			None => {
				if schema.required {
					errors.push(format!("field '{path}': required but missing"));
				}
			}
			Some(Bson::Null) => {
				if schema.required {
					errors.push(format!(
						"field '{path}': expected {}, got null",
						schema.field_type.type_name()
					));
				}
			}
			Some(value) => check_value(&path, schema, value, errors),
		}
	}
}

fn check_value(path: &str, schema: &FieldSchema, value: &Bson, errors: &mut Vec<String>) {
	match (&schema.field_type, value) {
		(
			FieldType::String {
				min_length,
				max_length,
				pattern,
			},
			Bson::String(s),
		) => {
			let len = s.chars().count();
			if let Some(min) = min_length {
				if len < *min {
					errors.push(format!(
						"field '{path}': string length {len} below minimum {min}"
					));
				}
			}
			if let Some(max) = max_length {
				if len > *max {
					errors.push(format!(
						"field '{path}': string length {len} above maximum {max}"
					));
				}
			}
			if let Some(pattern) = pattern {
				match Regex::new(pattern) {
					Ok(re) => {
						if !re.is_match(s) {
							errors.push(format!(
								"field '{path}': value does not match pattern '{pattern}'"
							));
						}
					}
					Err(_) => {
						errors.push(format!(
							"field '{path}': pattern '{pattern}' is not a valid regex"
						));
					}
				}
			}
		}

		(FieldType::Int { min, max }, value) => match int_value(value) {
			Some(n) => {
				if let Some(min) = min {
					if n < *min {
						errors.push(format!("field '{path}': value {n} below minimum {min}"));
					}
				}
				if let Some(max) = max {
					if n > *max {
						errors.push(format!("field '{path}': value {n} above maximum {max}"));
					}
				}
			}
			None => push_type_error(path, "int", value, errors),
		},

		(FieldType::Float { min, max }, value) => match float_value(value) {
			Some(n) => {
				if let Some(min) = min {
					if n < *min {
						errors.push(format!("field '{path}': value {n} below minimum {min}"));
					}
				}
				if let Some(max) = max {
					if n > *max {
						errors.push(format!("field '{path}': value {n} above maximum {max}"));
					}
				}
			}
			None => push_type_error(path, "float", value, errors),
		},

		(FieldType::Bool, Bson::Boolean(_)) => {}
		(FieldType::DateTime, Bson::DateTime(_)) => {}
		(FieldType::ObjectId, Bson::ObjectId(_)) => {}
		(FieldType::Reference { .. }, Bson::ObjectId(_)) => {}

		(FieldType::Enum { values }, Bson::String(s)) => {
			if !values.iter().any(|v| v == s) {
				errors.push(format!(
					"field '{path}': value '{s}' not in enum values [{}]",
					values.join(", ")
				));
			}
		}

		(
			FieldType::Array {
				items,
				min_items,
				max_items,
			},
			Bson::Array(array),
		) => {
			if let Some(min) = min_items {
				if array.len() < *min {
					errors.push(format!(
						"field '{path}': array length {} below minimum {min}",
						array.len()
					));
				}
			}
			if let Some(max) = max_items {
				if array.len() > *max {
					errors.push(format!(
						"field '{path}': array length {} above maximum {max}",
						array.len()
					));
				}
			}
			for (i, item) in array.iter().enumerate() {
				check_value(&format!("{path}[{i}]"), items, item, errors);
			}
		}

		(FieldType::Document { fields }, Bson::Document(doc)) => {
			check_shape(fields, doc, path, errors);
		}

		(expected, actual) => push_type_error(path, expected.type_name(), actual, errors),
	}
}

fn int_value(value: &Bson) -> Option<i64> {
	match value {
		Bson::Int32(n) => Some(i64::from(*n)),
		Bson::Int64(n) => Some(*n),
		_ => None,
	}
}

fn float_value(value: &Bson) -> Option<f64> {
	match value {
		Bson::Double(n) => Some(*n),
		Bson::Int32(n) => Some(f64::from(*n)),
		Bson::Int64(n) => Some(*n as f64),
		_ => None,
	}
}

fn push_type_error(path: &str, expected: &str, actual: &Bson, errors: &mut Vec<String>) {
	errors.push(format!(
		"field '{path}': expected {expected}, got {}",
		bson_type_name(actual)
	));
}

fn bson_type_name(value: &Bson) -> &'static str {
	match value {
		Bson::Double(_) => "double",
		Bson::String(_) => "string",
		Bson::Array(_) => "array",
		Bson::Document(_) => "document",
		Bson::Boolean(_) => "bool",
		Bson::Null => "null",
		Bson::Int32(_) => "int32",
		Bson::Int64(_) => "int64",
		Bson::ObjectId(_) => "object_id",
		Bson::DateTime(_) => "datetime",
		Bson::Timestamp(_) => "timestamp",
		Bson::Binary(_) => "binary",
		Bson::Decimal128(_) => "decimal128",
		_ => "unknown",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::index::{IndexKey, IndexKind};
	use bson::doc;
	use bson::oid::ObjectId;
	use rstest::rstest;

	fn users_schema() -> CollectionSchema {
		let schema: CollectionSchema = serde_json::from_str(
			r#"{
				"name": "users",
				"fields": {
					"email": {"type": "string", "min_length": 5, "max_length": 120},
					"age": {"type": "int", "min": 0, "max": 150, "required": false},
					"status": {"type": "enum", "values": ["active", "suspended"]},
					"address": {
						"type": "document",
						"required": false,
						"fields": {
							"street": {"type": "string"},
							"zip": {"type": "string", "required": false}
						}
					},
					"scores": {
						"type": "array",
						"required": false,
						"items": {"type": "float", "min": 0.0, "max": 1.0},
						"max_items": 3
					}
				}
			}"#,
		)
		.unwrap();
		schema
	}

	#[rstest]
	fn test_conforming_document_passes() {
		let schema = users_schema();
		let doc = doc! {
			"_id": ObjectId::new(),
			"email": "alice@example.com",
			"age": 30,
			"status": "active",
			"address": { "street": "1 Main St" },
			"scores": [0.25, 0.75],
		};
		assert!(schema.check_document(&doc).is_empty());
	}

	#[rstest]
	fn test_missing_required_field() {
		let schema = users_schema();
		let doc = doc! { "status": "active" };
		let errors = schema.check_document(&doc);
		assert!(
			errors
				.iter()
				.any(|e| e == "field 'email': required but missing")
		);
	}

	#[rstest]
	fn test_null_required_field_names_expected_type() {
		let schema = users_schema();
		let doc = doc! { "email": Bson::Null, "status": "active" };
		let errors = schema.check_document(&doc);
		assert!(
			errors
				.iter()
				.any(|e| e == "field 'email': expected string, got null")
		);
	}

	#[rstest]
	fn test_null_optional_field_is_accepted() {
		let schema = users_schema();
		let doc = doc! { "email": "alice@example.com", "status": "active", "age": Bson::Null };
		assert!(schema.check_document(&doc).is_empty());
	}

	#[rstest]
	fn test_type_mismatch() {
		let schema = users_schema();
		let doc = doc! { "email": 42, "status": "active" };
		let errors = schema.check_document(&doc);
		assert!(
			errors
				.iter()
				.any(|e| e == "field 'email': expected string, got int32")
		);
	}

	#[rstest]
	fn test_string_length_bounds() {
		let schema = users_schema();
		let doc = doc! { "email": "a@b", "status": "active" };
		let errors = schema.check_document(&doc);
		assert!(errors.iter().any(|e| e.contains("below minimum 5")));
	}

	#[rstest]
	fn test_int_range() {
		let schema = users_schema();
		let doc = doc! { "email": "alice@example.com", "status": "active", "age": 200 };
		let errors = schema.check_document(&doc);
		assert!(
			errors
				.iter()
				.any(|e| e == "field 'age': value 200 above maximum 150")
		);
	}

	#[rstest]
	fn test_enum_membership() {
		let schema = users_schema();
		let doc = doc! { "email": "alice@example.com", "status": "deleted" };
		let errors = schema.check_document(&doc);
		assert!(errors.iter().any(|e| e.contains("not in enum values")));
	}

	#[rstest]
	fn test_nested_document_errors_use_dotted_paths() {
		let schema = users_schema();
		let doc = doc! {
			"email": "alice@example.com",
			"status": "active",
			"address": { "zip": "12345" },
		};
		let errors = schema.check_document(&doc);
		assert!(
			errors
				.iter()
				.any(|e| e == "field 'address.street': required but missing")
		);
	}

	#[rstest]
	fn test_array_bounds_and_item_paths() {
		let schema = users_schema();
		let doc = doc! {
			"email": "alice@example.com",
			"status": "active",
			"scores": [0.5, 2.0, 0.1, 0.2],
		};
		let errors = schema.check_document(&doc);
		assert!(errors.iter().any(|e| e.contains("above maximum 3")));
		assert!(
			errors
				.iter()
				.any(|e| e == "field 'scores[1]': value 2 above maximum 1")
		);
	}

	#[rstest]
	fn test_pattern_constraint() {
		let schema: CollectionSchema = serde_json::from_str(
			r#"{
				"name": "codes",
				"fields": {
					"code": {"type": "string", "pattern": "^[A-Z]{3}-[0-9]{4}$"}
				}
			}"#,
		)
		.unwrap();

		assert!(schema.check_document(&doc! { "code": "ABC-1234" }).is_empty());
		let errors = schema.check_document(&doc! { "code": "nope" });
		assert!(errors.iter().any(|e| e.contains("does not match pattern")));
	}

	#[rstest]
	fn test_undeclared_fields_are_ignored() {
		let schema = users_schema();
		let doc = doc! {
			"email": "alice@example.com",
			"status": "active",
			"legacy_flag": true,
		};
		assert!(schema.check_document(&doc).is_empty());
	}

	#[rstest]
	fn test_resolve_field_dotted_path() {
		let schema = users_schema();
		assert!(schema.resolve_field("address.zip").is_some());
		assert!(schema.resolve_field("address.country").is_none());
		assert!(schema.resolve_field("email").is_some());
		assert!(schema.resolve_field("email.nested").is_none());
	}

	#[rstest]
	fn test_dependencies() {
		let schema: CollectionSchema = serde_json::from_str(
			r#"{
				"name": "orders",
				"fields": {
					"user_id": {"type": "reference", "collection": "users"},
					"product_ids": {
						"type": "array",
						"items": {"type": "reference", "collection": "products"}
					}
				}
			}"#,
		)
		.unwrap();
		assert_eq!(
			schema.dependencies(),
			vec!["users".to_string(), "products".to_string()]
		);
	}

	#[rstest]
	fn test_with_index_builder() {
		let schema = users_schema().with_index(
			IndexDefinition::new(
				"email_unique",
				vec![IndexKey::new("email", IndexKind::Ascending)],
			)
			.unique(),
		);
		assert_eq!(schema.indexes.len(), 1);
		assert!(schema.indexes[0].unique);
	}
}
