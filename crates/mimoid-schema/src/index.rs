//! Index definitions.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// Kind of a single index key.
///
/// Closed enumeration of the index key kinds the harness supports; serialized
/// to the wire values MongoDB expects (`1`, `-1`, `"text"`, `"hashed"`) only
/// at the driver edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
	/// Ascending order (wire value `1`).
	Ascending,

	/// Descending order (wire value `-1`).
	Descending,

	/// Text index (wire value `"text"`).
	Text,

	/// Hashed index (wire value `"hashed"`).
	Hashed,
}

impl IndexKind {
	/// Converts to the BSON value MongoDB expects in an index key document.
	pub fn to_bson(self) -> Bson {
		match self {
			Self::Ascending => Bson::Int32(1),
			Self::Descending => Bson::Int32(-1),
			Self::Text => Bson::String("text".to_string()),
			Self::Hashed => Bson::String("hashed".to_string()),
		}
	}
}

impl std::fmt::Display for IndexKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Ascending => write!(f, "ascending"),
			Self::Descending => write!(f, "descending"),
			Self::Text => write!(f, "text"),
			Self::Hashed => write!(f, "hashed"),
		}
	}
}

/// One key of an index: field name plus kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
	/// Field the key covers. Dotted paths reach into nested documents.
	pub field: String,

	/// Key kind.
	pub kind: IndexKind,
}

impl IndexKey {
	/// Creates a new index key.
	pub fn new(field: impl Into<String>, kind: IndexKind) -> Self {
		Self {
			field: field.into(),
			kind,
		}
	}
}

/// Declarative description of one index on a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
	/// Index name, unique within its collection.
	pub name: String,

	/// Ordered list of keys.
	pub keys: Vec<IndexKey>,

	/// Whether the indexed value combination must be unique across documents.
	#[serde(default)]
	pub unique: bool,

	/// Whether documents missing the indexed fields are skipped.
	#[serde(default)]
	pub sparse: bool,
}

impl IndexDefinition {
	/// Creates an index definition with the given name and keys.
	pub fn new(name: impl Into<String>, keys: Vec<IndexKey>) -> Self {
		Self {
			name: name.into(),
			keys,
			unique: false,
			sparse: false,
		}
	}

	/// Marks the index unique.
	pub fn unique(mut self) -> Self {
		self.unique = true;
		self
	}

	/// Marks the index sparse.
	pub fn sparse(mut self) -> Self {
		self.sparse = true;
		self
	}

	/// Renders the ordered key document MongoDB expects
	/// (e.g. `{ "email": 1, "created_at": -1 }`).
	pub fn keys_document(&self) -> Document {
		let mut doc = Document::new();
		for key in &self.keys {
			doc.insert(key.field.clone(), key.kind.to_bson());
		}
		doc
	}

	/// Names of the fields covered by this index, in key order.
	pub fn field_names(&self) -> Vec<&str> {
		self.keys.iter().map(|k| k.field.as_str()).collect()
	}
}
