//! Field shape definitions.
//!
//! A document shape is a map of field name to [`FieldSchema`]; the type and
//! constraints of each field are carried by the closed [`FieldType`] sum type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The type and constraints of a single document field.
///
/// Serialized with an internal `type` tag so schema authors write
/// `{"type": "string", "min_length": 3}` style JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
	/// UTF-8 string with optional length bounds and regex pattern.
	String {
		/// Minimum length in characters.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		min_length: Option<usize>,

		/// Maximum length in characters.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		max_length: Option<usize>,

		/// Regex the value must match.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		pattern: Option<String>,
	},

	/// 64-bit integer with optional inclusive range.
	Int {
		/// Minimum value (inclusive).
		#[serde(default, skip_serializing_if = "Option::is_none")]
		min: Option<i64>,

		/// Maximum value (inclusive).
		#[serde(default, skip_serializing_if = "Option::is_none")]
		max: Option<i64>,
	},

	/// 64-bit float with optional inclusive range.
	Float {
		/// Minimum value (inclusive).
		#[serde(default, skip_serializing_if = "Option::is_none")]
		min: Option<f64>,

		/// Maximum value (inclusive).
		#[serde(default, skip_serializing_if = "Option::is_none")]
		max: Option<f64>,
	},

	/// Boolean flag.
	Bool,

	/// BSON datetime.
	DateTime,

	/// BSON ObjectId.
	ObjectId,

	/// Closed set of string values.
	Enum {
		/// Allowed values, most common first (generation may skew toward the
		/// head of this list).
		values: Vec<String>,
	},

	/// Homogeneous array with optional size bounds.
	Array {
		/// Shape of each element.
		items: Box<FieldSchema>,

		/// Minimum number of elements.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		min_items: Option<usize>,

		/// Maximum number of elements.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		max_items: Option<usize>,
	},

	/// Nested sub-document with its own shape.
	Document {
		/// Field name to shape, in declaration order.
		fields: IndexMap<String, FieldSchema>,
	},

	/// Identifier of a document in another collection.
	Reference {
		/// Name of the referenced collection.
		collection: String,
	},
}

impl FieldType {
	/// Short human-readable name used in validation error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::String { .. } => "string",
			Self::Int { .. } => "int",
			Self::Float { .. } => "float",
			Self::Bool => "bool",
			Self::DateTime => "datetime",
			Self::ObjectId => "object_id",
			Self::Enum { .. } => "enum",
			Self::Array { .. } => "array",
			Self::Document { .. } => "document",
			Self::Reference { .. } => "reference",
		}
	}
}

/// A single field in a document shape: type, constraints, and whether the
/// field must be present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
	/// Type and constraints.
	#[serde(flatten)]
	pub field_type: FieldType,

	/// Whether the field must be present in every document. Defaults to true.
	#[serde(default = "default_required")]
	pub required: bool,

	/// Human-readable description.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub description: String,
}

fn default_required() -> bool {
	true
}

impl FieldSchema {
	/// Creates a required field of the given type.
	pub fn new(field_type: FieldType) -> Self {
		Self {
			field_type,
			required: true,
			description: String::new(),
		}
	}

	/// Creates an optional field of the given type.
	pub fn optional(field_type: FieldType) -> Self {
		Self {
			field_type,
			required: false,
			description: String::new(),
		}
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Collects the names of all collections this field (transitively)
	/// references.
	pub fn referenced_collections(&self, out: &mut Vec<String>) {
		match &self.field_type {
			FieldType::Reference { collection } => {
				if !out.contains(collection) {
					out.push(collection.clone());
				}
			}
			FieldType::Array { items, .. } => items.referenced_collections(out),
			FieldType::Document { fields } => {
				for field in fields.values() {
					field.referenced_collections(out);
				}
			}
			_ => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_field_type_from_json() {
		let field: FieldSchema = serde_json::from_str(
			r#"{"type": "string", "min_length": 3, "max_length": 20}"#,
		)
		.unwrap();
		assert!(field.required);
		assert_eq!(
			field.field_type,
			FieldType::String {
				min_length: Some(3),
				max_length: Some(20),
				pattern: None,
			}
		);
	}

	#[rstest]
	fn test_optional_field_from_json() {
		let field: FieldSchema =
			serde_json::from_str(r#"{"type": "bool", "required": false}"#).unwrap();
		assert!(!field.required);
		assert_eq!(field.field_type, FieldType::Bool);
	}

	#[rstest]
	fn test_nested_document_from_json() {
		let field: FieldSchema = serde_json::from_str(
			r#"{
				"type": "document",
				"fields": {
					"street": {"type": "string"},
					"zip": {"type": "string", "required": false}
				}
			}"#,
		)
		.unwrap();
		match &field.field_type {
			FieldType::Document { fields } => {
				assert_eq!(fields.len(), 2);
				// IndexMap preserves declaration order
				let names: Vec<&str> = fields.keys().map(String::as_str).collect();
				assert_eq!(names, vec!["street", "zip"]);
			}
			other => panic!("expected document, got {}", other.type_name()),
		}
	}

	#[rstest]
	#[case(FieldType::Bool, "bool")]
	#[case(FieldType::DateTime, "datetime")]
	#[case(FieldType::Reference { collection: "users".into() }, "reference")]
	fn test_type_name(#[case] field_type: FieldType, #[case] expected: &str) {
		assert_eq!(field_type.type_name(), expected);
	}

	#[rstest]
	fn test_referenced_collections_walks_nesting() {
		let field: FieldSchema = serde_json::from_str(
			r#"{
				"type": "document",
				"fields": {
					"owner_id": {"type": "reference", "collection": "users"},
					"tags": {
						"type": "array",
						"items": {"type": "reference", "collection": "tags"}
					}
				}
			}"#,
		)
		.unwrap();

		let mut refs = Vec::new();
		field.referenced_collections(&mut refs);
		assert_eq!(refs, vec!["users".to_string(), "tags".to_string()]);
	}

	#[rstest]
	fn test_serialization_roundtrip() {
		let field = FieldSchema::optional(FieldType::Enum {
			values: vec!["a".into(), "b".into()],
		})
		.with_description("category");
		let json = serde_json::to_string(&field).unwrap();
		let back: FieldSchema = serde_json::from_str(&json).unwrap();
		assert_eq!(field, back);
	}

	#[rstest]
	fn test_constructors() {
		assert!(FieldSchema::new(FieldType::Bool).required);
		assert!(!FieldSchema::optional(FieldType::Bool).required);
	}
}
