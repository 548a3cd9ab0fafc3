//! Mimoid seeding CLI.
//!
//! Thin lifecycle runner around the seeding harness: loads a schema JSON
//! artifact, connects to MongoDB, and drives clear → seed → index →
//! validate. Exits 0 only when the validation report's overall result is a
//! pass.
//!
//! ## Usage
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017"
//! mimoid-seed seed schema.json --count users=500 --count orders=2000
//! mimoid-seed validate schema.json --sample-size 25
//! mimoid-seed clear schema.json
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use mimoid_db::MongoBackend;
use mimoid_schema::DatabaseSchema;
use mimoid_seeding::prelude::*;

#[derive(Parser)]
#[command(name = "mimoid-seed")]
#[command(about = "Schema-driven MongoDB seeding and validation", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// MongoDB connection string
	#[arg(long, env = "MONGODB_URI", global = true)]
	uri: Option<String>,

	/// Database name (defaults to the schema's database name)
	#[arg(long, global = true)]
	database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Run the full lifecycle: clear, seed, create indexes, validate
	Seed {
		/// Path to the schema JSON artifact
		#[arg(value_name = "SCHEMA")]
		schema: PathBuf,

		/// Per-collection record count, e.g. --count users=500 (repeatable)
		#[arg(long = "count", value_parser = parse_count)]
		counts: Vec<(String, u64)>,

		/// Documents per bulk-insert batch
		#[arg(long, default_value_t = 1000)]
		batch_size: usize,

		/// Documents sampled per collection during validation
		#[arg(long, default_value_t = 10)]
		sample_size: usize,

		/// Record count for collections without an explicit --count
		#[arg(long, default_value_t = 100)]
		default_count: u64,

		/// Generator seed for reproducible data
		#[arg(long)]
		seed: Option<u64>,

		/// Print the validation report as JSON
		#[arg(long)]
		json: bool,
	},

	/// Validate existing data against the schema without writing
	Validate {
		/// Path to the schema JSON artifact
		#[arg(value_name = "SCHEMA")]
		schema: PathBuf,

		/// Documents sampled per collection
		#[arg(long, default_value_t = 10)]
		sample_size: usize,

		/// Print the validation report as JSON
		#[arg(long)]
		json: bool,
	},

	/// Drop every collection the schema declares
	Clear {
		/// Path to the schema JSON artifact
		#[arg(value_name = "SCHEMA")]
		schema: PathBuf,
	},
}

/// Parses a `collection=count` argument.
fn parse_count(raw: &str) -> Result<(String, u64), String> {
	let (name, count) = raw
		.split_once('=')
		.ok_or_else(|| format!("expected 'collection=count', got '{raw}'"))?;
	if name.is_empty() {
		return Err(format!("missing collection name in '{raw}'"));
	}
	let count: u64 = count
		.parse()
		.map_err(|_| format!("invalid count '{count}' in '{raw}'"))?;
	Ok((name.to_string(), count))
}

/// Loads and self-checks the schema artifact.
fn load_schema(path: &PathBuf) -> anyhow::Result<DatabaseSchema> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("cannot read schema file '{}'", path.display()))?;
	let schema: DatabaseSchema = serde_json::from_str(&content)
		.with_context(|| format!("cannot parse schema file '{}'", path.display()))?;
	schema.validate().context("schema failed its self-check")?;
	Ok(schema)
}

/// Connects to the store and runs the startup probe. Unreachability is a
/// startup-time fatal error; nothing is retried here.
async fn connect(cli: &Cli, schema: &DatabaseSchema) -> anyhow::Result<MongoBackend> {
	let uri = cli
		.uri
		.clone()
		.context("no connection string: set MONGODB_URI or pass --uri")?;
	let database = cli.database.clone().unwrap_or_else(|| schema.name.clone());

	let backend = MongoBackend::connect(&uri)
		.await
		.context("cannot create MongoDB client")?
		.with_database(&database);
	backend
		.health_check()
		.await
		.context("MongoDB is not reachable")?;
	Ok(backend)
}

fn print_report(report: &ValidationReport, json: bool) -> anyhow::Result<()> {
	if json {
		println!("{}", serde_json::to_string_pretty(report)?);
		return Ok(());
	}

	println!("{report}");
	if report.summary.overall_success {
		println!("{}", "Validation passed".green());
	} else {
		println!("{}", "Validation failed".red());
	}
	Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
	match &cli.command {
		Commands::Seed {
			schema,
			counts,
			batch_size,
			sample_size,
			default_count,
			seed,
			json,
		} => {
			let schema = load_schema(schema)?;
			let backend = connect(&cli, &schema).await?;

			let mut generator = GeneratorConfig::new();
			if let Some(seed) = seed {
				generator = generator.with_seed(*seed);
			}
			let config = SeederConfig::new()
				.with_batch_size(*batch_size)
				.with_sample_size(*sample_size)
				.with_default_count(*default_count)
				.with_generator(generator);

			let counts: HashMap<String, u64> = counts.iter().cloned().collect();
			let mut seeder = MongoSeeder::new(backend, schema, config)?;

			seeder.clear_database().await?;
			let summary = seeder.seed_all_collections(&counts).await?;
			println!("{summary}");
			seeder.create_indexes().await?;

			let report = seeder.validate_seed_data().await?;
			print_report(&report, *json)?;
			Ok(report.summary.overall_success)
		}

		Commands::Validate {
			schema,
			sample_size,
			json,
		} => {
			let schema = load_schema(schema)?;
			let backend = connect(&cli, &schema).await?;

			let seeder = MongoSeeder::new(backend, schema, SeederConfig::default())?;
			let report = seeder.validate_schema_and_indexes(*sample_size).await?;
			print_report(&report, *json)?;
			Ok(report.summary.overall_success)
		}

		Commands::Clear { schema } => {
			let schema = load_schema(schema)?;
			let backend = connect(&cli, &schema).await?;

			let seeder = MongoSeeder::new(backend, schema, SeederConfig::default())?;
			seeder.clear_database().await?;
			println!("{}", "Database cleared".green());
			Ok(true)
		}
	}
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let cli = Cli::parse();
	match run(cli).await {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(error) => {
			eprintln!("{} {error:#}", "error:".red());
			process::exit(2);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_count_valid() {
		assert_eq!(
			parse_count("users=500").unwrap(),
			("users".to_string(), 500)
		);
	}

	#[rstest]
	#[case("users")]
	#[case("=5")]
	#[case("users=five")]
	#[case("users=")]
	fn test_parse_count_invalid(#[case] raw: &str) {
		assert!(parse_count(raw).is_err());
	}

	#[rstest]
	fn test_cli_parses_seed_command() {
		let cli = Cli::parse_from([
			"mimoid-seed",
			"seed",
			"schema.json",
			"--count",
			"users=50",
			"--count",
			"orders=200",
			"--seed",
			"42",
			"--uri",
			"mongodb://localhost:27017",
		]);

		match cli.command {
			Commands::Seed { counts, seed, .. } => {
				assert_eq!(counts.len(), 2);
				assert_eq!(counts[0], ("users".to_string(), 50));
				assert_eq!(seed, Some(42));
			}
			_ => panic!("expected seed subcommand"),
		}
	}

	#[rstest]
	fn test_cli_parses_validate_command() {
		let cli = Cli::parse_from([
			"mimoid-seed",
			"validate",
			"schema.json",
			"--sample-size",
			"25",
		]);

		match cli.command {
			Commands::Validate { sample_size, .. } => assert_eq!(sample_size, 25),
			_ => panic!("expected validate subcommand"),
		}
	}
}
