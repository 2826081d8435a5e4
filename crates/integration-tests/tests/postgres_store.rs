//! `PostgreSQL` document store against a real database.
//!
//! These tests require:
//! - A disposable `PostgreSQL` database in `CLOUDMART_TEST_DATABASE_URL`
//!
//! Migrations are applied and `cloudmart.document` is truncated before each
//! test, so never point this at a database whose data matters. Tests take a
//! shared lock because they all use the same table.
//!
//! Run with: cargo test -p cloudmart-integration-tests --test postgres_store -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, MutexGuard};

use cloudmart_api::db::postgres::PostgresStore;
use cloudmart_api::db::seed::seed_catalog;
use cloudmart_api::db::{CartRepository, Collection, DocumentStore, OrderRepository, RepositoryError};
use cloudmart_api::models::{CartEntry, Order};
use cloudmart_api::services::cart::CartService;
use cloudmart_api::services::catalog::{CatalogError, CatalogService};
use cloudmart_api::services::orders::{OrderError, OrderService};
use cloudmart_core::{OwnerId, ProductId};
use cloudmart_integration_tests::{TestApp, empty_request, json_request};

static TABLE_LOCK: Mutex<()> = Mutex::const_new(());

/// Migrated, emptied store plus the guard that keeps other tests out.
async fn fresh_store() -> (MutexGuard<'static, ()>, PostgresStore) {
    let guard = TABLE_LOCK.lock().await;

    let url = std::env::var("CLOUDMART_TEST_DATABASE_URL")
        .expect("CLOUDMART_TEST_DATABASE_URL must point at a disposable database");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    let store = PostgresStore::from_pool(pool.clone());
    store.migrate().await.expect("Failed to run migrations");
    sqlx::query("TRUNCATE cloudmart.document")
        .execute(&pool)
        .await
        .expect("Failed to empty document table");

    (guard, store)
}

async fn seeded_store() -> (MutexGuard<'static, ()>, PostgresStore) {
    let (guard, store) = fresh_store().await;
    seed_catalog(&store).await.unwrap();
    (guard, store)
}

fn product_ids<'a, T>(items: &'a [T], id: impl Fn(&'a T) -> &'a ProductId) -> Vec<&'a str> {
    items.iter().map(|item| id(item).as_str()).collect()
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_seed_then_reseed_changes_nothing() {
    let (_guard, store) = fresh_store().await;

    let first = seed_catalog(&store).await.unwrap();
    let second = seed_catalog(&store).await.unwrap();

    assert_eq!(first.inserted, 8);
    assert!(!first.skipped);
    assert!(second.skipped);
    assert_eq!(second.inserted, 0);

    let products = CatalogService::new(Some(&store)).list_products(None).await;
    assert_eq!(
        product_ids(&products, |p| &p.id),
        vec!["1", "2", "3", "4", "5", "6", "7", "8"]
    );
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_create_if_absent_keeps_first_document() {
    let (_guard, store) = fresh_store().await;
    let doc = |name: &str| {
        json!({"id": "x", "name": name, "price": 1.0})
            .as_object()
            .cloned()
            .unwrap()
    };

    assert!(store.create_if_absent(Collection::Products, doc("first")).await.unwrap());
    assert!(!store.create_if_absent(Collection::Products, doc("second")).await.unwrap());

    let all = store.list_all(Collection::Products).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["name"], "first");
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_category_filter_is_exact() {
    let (_guard, store) = seeded_store().await;
    let catalog = CatalogService::new(Some(&store));

    let home = catalog.list_products(Some("Home")).await;
    let lower = catalog.list_products(Some("home")).await;
    let blank = catalog.list_products(Some("")).await;

    assert_eq!(product_ids(&home, |p| &p.id), vec!["5", "8"]);
    assert!(lower.is_empty());
    assert_eq!(blank.len(), 8);
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_search_is_case_sensitive_substring() {
    let (_guard, store) = seeded_store().await;
    let catalog = CatalogService::new(Some(&store));

    assert_eq!(product_ids(&catalog.search("Pro").await, |p| &p.id), vec!["1", "4"]);
    assert_eq!(product_ids(&catalog.search("Sports").await, |p| &p.id), vec!["3", "6"]);
    assert!(catalog.search("pro").await.is_empty());
    assert_eq!(catalog.search("").await.len(), 8);
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_distinct_categories_and_lookup() {
    let (_guard, store) = seeded_store().await;
    let catalog = CatalogService::new(Some(&store));

    let mut categories = catalog.list_categories().await;
    categories.sort();

    assert_eq!(categories, vec!["Accessories", "Electronics", "Home", "Sports"]);
    assert_eq!(
        catalog.get_product(&ProductId::new("3")).await.unwrap().name,
        "Running Shoes X1"
    );
    assert!(matches!(
        catalog.get_product(&ProductId::new("999")).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_cart_overwrite_and_remove() {
    let (_guard, store) = seeded_store().await;
    let cart = CartService::new(Some(&store));
    let owner = OwnerId::shared();

    cart.add_or_update(&owner, &ProductId::new("3"), 2).await.unwrap();
    cart.add_or_update(&owner, &ProductId::new("1"), 1).await.unwrap();
    cart.add_or_update(&owner, &ProductId::new("3"), 5).await.unwrap();

    let lines = cart.get_cart(&owner).await;
    let summary: Vec<(&str, u32)> = lines
        .iter()
        .map(|line| (line.id.as_str(), line.quantity))
        .collect();
    assert_eq!(summary, vec![("3", 5), ("1", 1)]);
    assert_eq!(store.list_all(Collection::Cart).await.unwrap().len(), 2);

    cart.remove(&owner, &ProductId::new("8")).await.unwrap();
    cart.remove(&owner, &ProductId::new("3")).await.unwrap();

    let remaining = cart.get_cart(&owner).await;
    assert_eq!(product_ids(&remaining, |line| &line.id), vec!["1"]);
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_delete_is_partition_scoped() {
    let (_guard, store) = fresh_store().await;
    let entry = CartEntry::new(OwnerId::shared(), ProductId::new("2"), 1);
    CartRepository::new(&store).save(&entry).await.unwrap();

    let wrong_owner = store
        .delete_by_id(Collection::Cart, entry.id.as_str(), "someone_else")
        .await
        .unwrap();
    let right_owner = store
        .delete_by_id(Collection::Cart, entry.id.as_str(), "demo_user")
        .await
        .unwrap();

    assert!(!wrong_owner);
    assert!(right_owner);
    assert!(store.list_all(Collection::Cart).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_order_consumes_cart() {
    let (_guard, store) = seeded_store().await;
    let cart = CartService::new(Some(&store));
    let orders = OrderService::new(Some(&store));
    let owner = OwnerId::shared();

    cart.add_or_update(&owner, &ProductId::new("3"), 5).await.unwrap();
    cart.add_or_update(&owner, &ProductId::new("1"), 1).await.unwrap();

    let order = orders.place_order(&owner).await.unwrap();

    assert_eq!(product_ids(&order.items, |line| &line.product_id), vec!["3", "1"]);
    assert!(cart.get_cart(&owner).await.is_empty());
    assert_eq!(orders.list_orders(&owner).await, vec![order.clone()]);
    assert!(matches!(
        orders.place_order(&owner).await,
        Err(OrderError::EmptyCart)
    ));

    let duplicate: Result<(), RepositoryError> =
        OrderRepository::new(&store).create(&order).await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
    assert_eq!(orders.list_orders(&owner).await, vec![order]);
}

#[tokio::test]
#[ignore = "Requires CLOUDMART_TEST_DATABASE_URL"]
async fn test_http_flow_over_postgres() {
    let (_guard, store) = seeded_store().await;
    let store: Arc<dyn DocumentStore> = Arc::new(store);
    let app = TestApp::with_store(Some(store));
    let token = app.login().await;

    let health = app.send(empty_request("GET", "/health", None)).await;
    assert_eq!(health.body["database"], "postgres");
    assert_eq!(health.body["db_status"], "connected");

    let add = app
        .send(json_request(
            "POST",
            "/api/v1/cart/items",
            &json!({"product_id": "7", "quantity": 2}),
            Some(&token),
        ))
        .await;
    assert_eq!(add.status, StatusCode::OK);

    let order = app
        .send(empty_request("POST", "/api/v1/orders", Some(&token)))
        .await;
    assert_eq!(order.status, StatusCode::OK);
    let placed: Order = serde_json::from_value(order.body).unwrap();
    assert_eq!(placed.items.len(), 1);

    let cart = app
        .send(empty_request("GET", "/api/v1/cart", Some(&token)))
        .await;
    assert_eq!(cart.body, json!([]));
}
