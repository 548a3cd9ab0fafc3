//! Synthetic document generation.
//!
//! [`DocumentGenerator`] produces documents for one collection at a time,
//! honoring the declared shape constraints and drawing reference values from
//! the identifier pools of already-loaded collections. Generation is
//! deterministic when a seed (and reference time) is configured.

mod pattern;
mod text;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::Duration;
use chrono::{DateTime, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use mimoid_schema::{CollectionSchema, FieldSchema, FieldType};

use crate::config::GeneratorConfig;
use crate::error::{SeedingError, SeedingResult};
use crate::pools::IdentifierPools;

/// Produces synthetic documents for a collection schema.
///
/// The generator owns its RNG: collections seeded through the same generator
/// instance share one deterministic stream, so a whole run reproduces from a
/// single seed.
pub struct DocumentGenerator {
	config: GeneratorConfig,
	rng: StdRng,
	reference_time: DateTime<Utc>,
}

impl DocumentGenerator {
	/// Creates a generator from the given configuration.
	pub fn new(config: GeneratorConfig) -> Self {
		let rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		let reference_time = config.reference_time.unwrap_or_else(Utc::now);
		Self {
			config,
			rng,
			reference_time,
		}
	}

	/// Generates exactly `count` documents for the collection.
	///
	/// Every document carries a fresh `_id`. Reference fields draw from
	/// `pools`; a required reference against a missing or empty pool fails
	/// with [`SeedingError::ReferenceIntegrity`] naming the unmet dependency.
	pub fn generate(
		&mut self,
		schema: &CollectionSchema,
		count: u64,
		pools: &IdentifierPools,
	) -> SeedingResult<Vec<Document>> {
		let unique_fields = unique_seed_fields(schema);
		let mut documents = Vec::with_capacity(count as usize);

		for ordinal in 0..count {
			let mut document = Document::new();
			document.insert("_id", self.object_id());
			self.fill_shape(
				&mut document,
				&schema.name,
				&schema.fields,
				&unique_fields,
				ordinal,
				pools,
			)?;
			documents.push(document);
		}

		Ok(documents)
	}

	fn fill_shape(
		&mut self,
		document: &mut Document,
		collection: &str,
		fields: &indexmap::IndexMap<String, FieldSchema>,
		unique_fields: &HashSet<String>,
		ordinal: u64,
		pools: &IdentifierPools,
	) -> SeedingResult<()> {
		for (name, field) in fields {
			if !field.required && !self.rng.gen_bool(self.config.optional_presence) {
				continue;
			}

			let unique = unique_fields.contains(name.as_str());
			if let Some(value) =
				self.field_value(collection, name, field, unique, ordinal, pools)?
			{
				document.insert(name.clone(), value);
			}
		}
		Ok(())
	}

	fn field_value(
		&mut self,
		collection: &str,
		name: &str,
		field: &FieldSchema,
		unique: bool,
		ordinal: u64,
		pools: &IdentifierPools,
	) -> SeedingResult<Option<Bson>> {
		let value = match &field.field_type {
			FieldType::String {
				min_length,
				max_length,
				pattern,
			} => {
				let base = match pattern {
					Some(pattern) => pattern::synthesize(pattern, &mut self.rng)
						.unwrap_or_else(|| text::string_for_field(name, &mut self.rng)),
					None => text::string_for_field(name, &mut self.rng),
				};
				// Uniquification would break pattern adherence, so
				// pattern-constrained fields rely on the pattern's own space.
				let base = if unique && pattern.is_none() {
					text::uniquify(base, ordinal, *max_length)
				} else {
					base
				};
				Bson::String(text::clamp_length(
					base,
					*min_length,
					*max_length,
					&mut self.rng,
				))
			}

			FieldType::Int { min, max } => {
				let lo = min.unwrap_or(0);
				let hi = max.unwrap_or_else(|| lo.saturating_add(1_000_000));
				let value = if unique {
					// Sequential walk keeps unique-indexed ints collision-free.
					let span = (hi - lo + 1) as u64;
					lo + (ordinal % span) as i64
				} else {
					self.rng.gen_range(lo..=hi)
				};
				Bson::Int64(value)
			}

			FieldType::Float { min, max } => {
				let lo = min.unwrap_or(0.0);
				let hi = max.unwrap_or(lo + 1000.0);
				Bson::Double(self.rng.gen_range(lo..=hi))
			}

			FieldType::Bool => Bson::Boolean(self.rng.gen_bool(0.5)),

			FieldType::DateTime => Bson::DateTime(self.recent_timestamp()),

			FieldType::ObjectId => Bson::ObjectId(self.object_id()),

			FieldType::Enum { values } => Bson::String(self.enum_value(values)),

			FieldType::Array {
				items,
				min_items,
				max_items,
			} => {
				let lo = min_items.unwrap_or(0);
				let hi = max_items.unwrap_or(lo + 3);
				let len = self.rng.gen_range(lo..=hi);
				let mut array = Vec::with_capacity(len);
				for _ in 0..len {
					if let Some(item) =
						self.field_value(collection, name, items, false, ordinal, pools)?
					{
						array.push(item);
					}
				}
				Bson::Array(array)
			}

			FieldType::Document { fields } => {
				let mut nested = Document::new();
				// Uniqueness is enforced on top-level fields only.
				self.fill_shape(
					&mut nested,
					collection,
					fields,
					&HashSet::new(),
					ordinal,
					pools,
				)?;
				Bson::Document(nested)
			}

			FieldType::Reference {
				collection: dependency,
			} => match pools.get(dependency) {
				Some(ids) if !ids.is_empty() => {
					let id = ids[self.rng.gen_range(0..ids.len())];
					Bson::ObjectId(id)
				}
				_ => {
					if field.required {
						return Err(SeedingError::ReferenceIntegrity {
							collection: collection.to_string(),
							dependency: dependency.clone(),
						});
					}
					return Ok(None);
				}
			},
		};

		Ok(Some(value))
	}

	/// A random ObjectId drawn from the generator's own RNG, so seeded runs
	/// reproduce identifiers too.
	fn object_id(&mut self) -> ObjectId {
		ObjectId::from_bytes(self.rng.r#gen::<[u8; 12]>())
	}

	/// Recency-weighted timestamp inside the configured window: squaring the
	/// unit sample biases draws toward the reference time.
	fn recent_timestamp(&mut self) -> bson::DateTime {
		let window_ms = self.config.recency_window_days * 24 * 60 * 60 * 1000;
		let unit: f64 = self.rng.r#gen();
		let offset_ms = (unit * unit * window_ms as f64) as i64;
		let instant = self.reference_time - Duration::milliseconds(offset_ms);
		bson::DateTime::from_chrono(instant)
	}

	fn enum_value(&mut self, values: &[String]) -> String {
		if values.len() == 1 || !self.config.skewed_enums {
			return values[self.rng.gen_range(0..values.len())].clone();
		}

		let weights: Vec<f64> = (0..values.len())
			.map(|i| self.config.enum_skew.powi(i as i32))
			.collect();
		// Weights are positive by construction, so this cannot fail.
		match WeightedIndex::new(&weights) {
			Ok(distribution) => values[distribution.sample(&mut self.rng)].clone(),
			Err(_) => values[self.rng.gen_range(0..values.len())].clone(),
		}
	}
}

/// Fields whose values must not collide within a run: the first key of every
/// unique index. Making one component of a compound unique index
/// collision-free keeps the combination collision-free.
fn unique_seed_fields(schema: &CollectionSchema) -> HashSet<String> {
	schema
		.indexes
		.iter()
		.filter(|index| index.unique)
		.filter_map(|index| index.keys.first())
		.map(|key| key.field.clone())
		.collect()
}
