//! Configuration for generation and seeding.

use chrono::{DateTime, Utc};

/// Tuning knobs for the document generator.
///
/// Distribution shaping (enum skew, timestamp recency) is a data-quality
/// property, not a correctness one; all of it is adjustable here rather than
/// hard-coded in the generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
	/// Seed for the random number generator. With the same seed, schema, and
	/// identifier pools the generator produces identical output (pair with
	/// [`GeneratorConfig::reference_time`] for fully reproducible runs).
	pub seed: Option<u64>,

	/// Probability that an optional field is populated.
	pub optional_presence: f64,

	/// Whether enum values are drawn with a skew toward the head of the
	/// declared value list instead of uniformly.
	pub skewed_enums: bool,

	/// Per-position decay factor for the enum skew. With the default of
	/// 0.45, a two-value enum lands near a 70/30 split.
	pub enum_skew: f64,

	/// Window for generated timestamps, counted back from the reference
	/// time. Values are recency-weighted within the window.
	pub recency_window_days: i64,

	/// Upper bound for generated timestamps. Defaults to the wall clock at
	/// generator construction; set explicitly for reproducible output.
	pub reference_time: Option<DateTime<Utc>>,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			seed: None,
			optional_presence: 0.7,
			skewed_enums: true,
			enum_skew: 0.45,
			recency_window_days: 365,
			reference_time: None,
		}
	}
}

impl GeneratorConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the generator seed.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Sets the optional-field presence probability.
	pub fn with_optional_presence(mut self, probability: f64) -> Self {
		self.optional_presence = probability.clamp(0.0, 1.0);
		self
	}

	/// Enables or disables enum skew.
	pub fn with_skewed_enums(mut self, skewed: bool) -> Self {
		self.skewed_enums = skewed;
		self
	}

	/// Sets the enum skew decay factor.
	pub fn with_enum_skew(mut self, skew: f64) -> Self {
		self.enum_skew = skew.clamp(0.01, 1.0);
		self
	}

	/// Sets the timestamp recency window in days.
	pub fn with_recency_window_days(mut self, days: i64) -> Self {
		self.recency_window_days = days.max(1);
		self
	}

	/// Pins the timestamp reference time.
	pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
		self.reference_time = Some(reference_time);
		self
	}
}

/// Configuration for the seeder lifecycle.
#[derive(Debug, Clone)]
pub struct SeederConfig {
	/// Documents per bulk-insert batch.
	pub batch_size: usize,

	/// Documents sampled per collection during schema validation.
	pub sample_size: usize,

	/// Record count used for collections without an explicit count.
	pub default_count: u64,

	/// Generator tuning.
	pub generator: GeneratorConfig,
}

impl Default for SeederConfig {
	fn default() -> Self {
		Self {
			batch_size: 1000,
			sample_size: 10,
			default_count: 100,
			generator: GeneratorConfig::default(),
		}
	}
}

impl SeederConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the bulk-insert batch size.
	pub fn with_batch_size(mut self, batch_size: usize) -> Self {
		self.batch_size = batch_size.max(1);
		self
	}

	/// Sets the validation sample size.
	pub fn with_sample_size(mut self, sample_size: usize) -> Self {
		self.sample_size = sample_size.max(1);
		self
	}

	/// Sets the default per-collection record count.
	pub fn with_default_count(mut self, count: u64) -> Self {
		self.default_count = count;
		self
	}

	/// Sets the generator configuration.
	pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
		self.generator = generator;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let config = SeederConfig::default();
		assert_eq!(config.batch_size, 1000);
		assert_eq!(config.sample_size, 10);
		assert_eq!(config.default_count, 100);
		assert!(config.generator.seed.is_none());
		assert!(config.generator.skewed_enums);
	}

	#[rstest]
	fn test_builders() {
		let config = SeederConfig::new()
			.with_batch_size(250)
			.with_sample_size(25)
			.with_default_count(10)
			.with_generator(GeneratorConfig::new().with_seed(42).with_skewed_enums(false));

		assert_eq!(config.batch_size, 250);
		assert_eq!(config.sample_size, 25);
		assert_eq!(config.default_count, 10);
		assert_eq!(config.generator.seed, Some(42));
		assert!(!config.generator.skewed_enums);
	}

	#[rstest]
	fn test_bounds_are_clamped() {
		let generator = GeneratorConfig::new()
			.with_optional_presence(7.0)
			.with_enum_skew(0.0)
			.with_recency_window_days(-5);

		assert_eq!(generator.optional_presence, 1.0);
		assert_eq!(generator.enum_skew, 0.01);
		assert_eq!(generator.recency_window_days, 1);

		let config = SeederConfig::new().with_batch_size(0).with_sample_size(0);
		assert_eq!(config.batch_size, 1);
		assert_eq!(config.sample_size, 1);
	}
}
