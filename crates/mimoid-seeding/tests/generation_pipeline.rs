//! End-to-end generation pipeline tests (no database required).
//!
//! Drives the public API the way the orchestrator does: generate a parent
//! collection, publish its identifier pool, generate a dependent collection,
//! and check the results against the declared shapes.

use std::collections::HashSet;

use bson::oid::ObjectId;
use chrono::TimeZone;
use chrono::Utc;
use rstest::rstest;

use mimoid_schema::DatabaseSchema;
use mimoid_seeding::prelude::*;

fn shop_schema() -> DatabaseSchema {
	serde_json::from_str(
		r#"{
			"name": "shop",
			"description": "Online shop with users, products, and orders",
			"collections": [
				{
					"name": "users",
					"fields": {
						"email": {"type": "string", "min_length": 5, "max_length": 120},
						"full_name": {"type": "string", "min_length": 2, "max_length": 80},
						"tier": {"type": "enum", "values": ["free", "plus", "business"]},
						"created_at": {"type": "date_time"},
						"marketing_opt_in": {"type": "bool", "required": false}
					},
					"indexes": [
						{
							"name": "email_unique",
							"keys": [{"field": "email", "kind": "ascending"}],
							"unique": true
						}
					]
				},
				{
					"name": "products",
					"fields": {
						"sku": {"type": "string", "pattern": "^[A-Z]{3}-[0-9]{4}$"},
						"price": {"type": "float", "min": 0.5, "max": 5000.0},
						"stock": {"type": "int", "min": 0, "max": 10000}
					},
					"indexes": [
						{
							"name": "sku_unique",
							"keys": [{"field": "sku", "kind": "ascending"}],
							"unique": true
						}
					]
				},
				{
					"name": "orders",
					"fields": {
						"user_id": {"type": "reference", "collection": "users"},
						"product_ids": {
							"type": "array",
							"items": {"type": "reference", "collection": "products"},
							"min_items": 1,
							"max_items": 5
						},
						"status": {"type": "enum", "values": ["pending", "shipped", "delivered", "cancelled"]},
						"placed_at": {"type": "date_time"},
						"total": {"type": "float", "min": 0.5, "max": 25000.0}
					},
					"indexes": [
						{
							"name": "user_placed",
							"keys": [
								{"field": "user_id", "kind": "ascending"},
								{"field": "placed_at", "kind": "descending"}
							]
						}
					]
				}
			]
		}"#,
	)
	.unwrap()
}

fn generator(seed: u64) -> DocumentGenerator {
	let reference = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
	DocumentGenerator::new(
		GeneratorConfig::new()
			.with_seed(seed)
			.with_reference_time(reference),
	)
}

/// Generates users → products → orders the way the orchestrator would,
/// returning the documents per collection.
fn generate_all(
	seed: u64,
	user_count: u64,
	product_count: u64,
	order_count: u64,
) -> (
	Vec<bson::Document>,
	Vec<bson::Document>,
	Vec<bson::Document>,
) {
	let schema = shop_schema();
	schema.validate().unwrap();

	let mut generator = generator(seed);
	let mut pools = IdentifierPools::new();

	let users = generator
		.generate(schema.collection("users").unwrap(), user_count, &pools)
		.unwrap();
	pools.publish("users", ids_of(&users));

	let products = generator
		.generate(schema.collection("products").unwrap(), product_count, &pools)
		.unwrap();
	pools.publish("products", ids_of(&products));

	let orders = generator
		.generate(schema.collection("orders").unwrap(), order_count, &pools)
		.unwrap();

	(users, products, orders)
}

fn ids_of(documents: &[bson::Document]) -> Vec<ObjectId> {
	documents
		.iter()
		.map(|d| d.get_object_id("_id").unwrap())
		.collect()
}

#[rstest]
fn test_counts_are_exact() {
	let (users, products, orders) = generate_all(1, 50, 20, 200);
	assert_eq!(users.len(), 50);
	assert_eq!(products.len(), 20);
	assert_eq!(orders.len(), 200);
}

#[rstest]
fn test_every_document_conforms_to_its_shape() {
	let schema = shop_schema();
	let (users, products, orders) = generate_all(2, 40, 15, 120);

	for (name, docs) in [("users", &users), ("products", &products), ("orders", &orders)] {
		let collection = schema.collection(name).unwrap();
		for doc in docs {
			let errors = collection.check_document(doc);
			assert!(errors.is_empty(), "{name}: {errors:?}");
		}
	}
}

#[rstest]
fn test_referential_integrity_across_collections() {
	let (users, products, orders) = generate_all(3, 30, 10, 300);

	let user_ids: HashSet<ObjectId> = ids_of(&users).into_iter().collect();
	let product_ids: HashSet<ObjectId> = ids_of(&products).into_iter().collect();

	for order in &orders {
		let user_id = order.get_object_id("user_id").unwrap();
		assert!(user_ids.contains(&user_id));

		for item in order.get_array("product_ids").unwrap() {
			let product_id = item.as_object_id().unwrap();
			assert!(product_ids.contains(&product_id));
		}
	}
}

#[rstest]
fn test_unique_fields_have_no_collisions() {
	let (users, products, _) = generate_all(4, 5000, 500, 0);

	let emails: HashSet<&str> = users.iter().map(|d| d.get_str("email").unwrap()).collect();
	assert_eq!(emails.len(), users.len());

	// SKU uniqueness rides on the pattern's value space, so collisions are
	// possible in principle; the declared space (26^3 * 10^4) keeps them
	// out of reach for this volume.
	let skus: HashSet<&str> = products.iter().map(|d| d.get_str("sku").unwrap()).collect();
	assert!(skus.len() as f64 >= products.len() as f64 * 0.99);
}

#[rstest]
fn test_whole_run_reproduces_from_one_seed() {
	let run_a = generate_all(42, 25, 10, 80);
	let run_b = generate_all(42, 25, 10, 80);
	assert_eq!(run_a, run_b);
}

#[rstest]
fn test_generating_orders_before_users_fails() {
	let schema = shop_schema();
	let mut generator = generator(5);
	let pools = IdentifierPools::new();

	let error = generator
		.generate(schema.collection("orders").unwrap(), 10, &pools)
		.unwrap_err();
	assert!(matches!(
		error,
		SeedingError::ReferenceIntegrity { collection, dependency }
			if collection == "orders" && dependency == "users"
	));
}

#[rstest]
fn test_report_over_generated_documents_is_clean() {
	let schema = shop_schema();
	let (users, _, _) = generate_all(6, 10, 5, 0);

	// Emulate the validator's schema phase over an in-memory sample.
	let collection = schema.collection("users").unwrap();
	let errors: Vec<String> = users
		.iter()
		.flat_map(|d| collection.check_document(d))
		.collect();

	let outcome = CheckOutcome::from_errors(errors);
	assert!(outcome.passed);
}
