//! Identifier pools: the ids of already-loaded documents, per collection.

use std::collections::HashMap;

use bson::oid::ObjectId;

/// Identifiers of loaded documents, keyed by collection name.
///
/// The orchestrator publishes each collection's pool exactly once, after that
/// collection's load completes; downstream generators only read. Publishing
/// happens strictly in dependency order, so a missing pool at generation time
/// is an ordering bug, not a race.
#[derive(Debug, Clone, Default)]
pub struct IdentifierPools {
	pools: HashMap<String, Vec<ObjectId>>,
}

impl IdentifierPools {
	/// Creates an empty set of pools.
	pub fn new() -> Self {
		Self::default()
	}

	/// Publishes the identifier pool for a collection.
	///
	/// Pools are write-once; publishing a second time for the same
	/// collection replaces the pool and logs a warning, since it signals a
	/// lifecycle misuse.
	pub fn publish(&mut self, collection: impl Into<String>, ids: Vec<ObjectId>) {
		let collection = collection.into();
		if self.pools.insert(collection.clone(), ids).is_some() {
			tracing::warn!(collection = %collection, "identifier pool published twice");
		}
	}

	/// The pool for a collection, if published.
	pub fn get(&self, collection: &str) -> Option<&[ObjectId]> {
		self.pools.get(collection).map(Vec::as_slice)
	}

	/// Whether a (possibly empty) pool was published for the collection.
	pub fn contains(&self, collection: &str) -> bool {
		self.pools.contains_key(collection)
	}

	/// Number of published pools.
	pub fn len(&self) -> usize {
		self.pools.len()
	}

	/// Whether no pools have been published.
	pub fn is_empty(&self) -> bool {
		self.pools.is_empty()
	}
}
