//! End-to-end HTTP flows over an in-memory store.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! server or database is needed.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use cloudmart_integration_tests::{TestApp, empty_request, json_request};

fn ids(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_with_demo_credentials() {
    let app = TestApp::seeded().await;

    let response = app
        .send(json_request(
            "POST",
            "/auth/login",
            &json!({"username": "demo", "password": "demo123"}),
            None,
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "bearer");
    assert!(!response.body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = TestApp::seeded().await;

    let response = app
        .send(json_request(
            "POST",
            "/auth/login",
            &json!({"username": "demo", "password": "wrong"}),
            None,
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({"error": "Invalid credentials"}));
}

#[tokio::test]
async fn test_cart_requires_token() {
    let app = TestApp::seeded().await;

    let missing = app.send(empty_request("GET", "/api/v1/cart", None)).await;
    let garbage = app
        .send(empty_request("GET", "/api/v1/cart", Some("not.a.token")))
        .await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body, json!({"error": "Not authenticated"}));
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body, json!({"error": "Invalid or expired token"}));
}

#[tokio::test]
async fn test_cart_is_empty_after_login() {
    let app = TestApp::seeded().await;
    let token = app.login().await;

    let response = app
        .send(empty_request("GET", "/api/v1/cart", Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_protected_writes_require_token() {
    let app = TestApp::seeded().await;

    let add = app
        .send(json_request(
            "POST",
            "/api/v1/cart/items",
            &json!({"product_id": "1"}),
            None,
        ))
        .await;
    let order = app.send(empty_request("POST", "/api/v1/orders", None)).await;
    let history = app.send(empty_request("GET", "/api/v1/orders", None)).await;

    assert_eq!(add.status, StatusCode::UNAUTHORIZED);
    assert_eq!(order.status, StatusCode::UNAUTHORIZED);
    assert_eq!(history.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_product_listing_and_category_filter() {
    let app = TestApp::seeded().await;

    let all = app.send(empty_request("GET", "/api/v1/products", None)).await;
    let home = app
        .send(empty_request("GET", "/api/v1/products?category=Home", None))
        .await;
    let blank = app
        .send(empty_request("GET", "/api/v1/products?category=", None))
        .await;

    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(ids(&all.body), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert_eq!(ids(&home.body), vec!["5", "8"]);
    assert_eq!(ids(&blank.body).len(), 8);
    assert_eq!(all.body[0]["price"], 199.99);
    assert_eq!(all.body[0]["image"], "🎧");
}

#[tokio::test]
async fn test_product_detail() {
    let app = TestApp::seeded().await;

    let found = app
        .send(empty_request("GET", "/api/v1/products/3", None))
        .await;
    let missing = app
        .send(empty_request("GET", "/api/v1/products/999", None))
        .await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["name"], "Running Shoes X1");
    assert_eq!(found.body["stock"], 100);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body, json!({"error": "Product not found"}));
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::seeded().await;

    let speaker = app
        .send(empty_request("GET", "/api/v1/search?q=Speaker", None))
        .await;
    let sports = app
        .send(empty_request("GET", "/api/v1/search?q=Sports", None))
        .await;
    let empty = app
        .send(empty_request("GET", "/api/v1/search?q=", None))
        .await;
    let missing = app.send(empty_request("GET", "/api/v1/search", None)).await;

    assert_eq!(ids(&speaker.body), vec!["7"]);
    assert_eq!(ids(&sports.body), vec!["3", "6"]);
    assert_eq!(ids(&empty.body).len(), 8);
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert!(missing.body["error"].is_string());
}

#[tokio::test]
async fn test_categories_are_distinct() {
    let app = TestApp::seeded().await;

    let response = app
        .send(empty_request("GET", "/api/v1/categories", None))
        .await;

    let mut categories: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    categories.sort_unstable();
    assert_eq!(
        categories,
        vec!["Accessories", "Electronics", "Home", "Sports"]
    );
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_twice_overwrites_quantity() {
    let app = TestApp::seeded().await;
    let token = app.login().await;

    for quantity in [2, 5] {
        let response = app
            .send(json_request(
                "POST",
                "/api/v1/cart/items",
                &json!({"product_id": "6", "quantity": quantity}),
                Some(&token),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["message"], "Saved to cart");
    }

    let cart = app
        .send(empty_request("GET", "/api/v1/cart", Some(&token)))
        .await;

    assert_eq!(
        cart.body,
        json!([{
            "id": "6",
            "name": "Yoga Mat Premium",
            "price": 35.99,
            "quantity": 5,
            "image": "🧘",
            "category": "Sports",
        }])
    );
}

#[tokio::test]
async fn test_quantity_defaults_to_one() {
    let app = TestApp::seeded().await;
    let token = app.login().await;

    app.send(json_request(
        "POST",
        "/api/v1/cart/items",
        &json!({"product_id": "2"}),
        Some(&token),
    ))
    .await;

    let cart = app
        .send(empty_request("GET", "/api/v1/cart", Some(&token)))
        .await;
    assert_eq!(cart.body[0]["quantity"], 1);
}

#[tokio::test]
async fn test_invalid_quantity_is_rejected() {
    let app = TestApp::seeded().await;
    let token = app.login().await;

    let response = app
        .send(json_request(
            "POST",
            "/api/v1/cart/items",
            &json!({"product_id": "2", "quantity": 0}),
            Some(&token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn test_remove_present_and_absent_products() {
    let app = TestApp::seeded().await;
    let token = app.login().await;

    app.send(json_request(
        "POST",
        "/api/v1/cart/items",
        &json!({"product_id": "4", "quantity": 1}),
        Some(&token),
    ))
    .await;

    let absent = app
        .send(empty_request("DELETE", "/api/v1/cart/items/8", Some(&token)))
        .await;
    assert_eq!(absent.status, StatusCode::OK);
    assert_eq!(absent.body["message"], "Removed from cart");

    let present = app
        .send(empty_request("DELETE", "/api/v1/cart/items/4", Some(&token)))
        .await;
    assert_eq!(present.status, StatusCode::OK);

    let cart = app
        .send(empty_request("GET", "/api/v1/cart", Some(&token)))
        .await;
    assert_eq!(cart.body, json!([]));
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_empty_cart_order_conflicts() {
    let app = TestApp::seeded().await;
    let token = app.login().await;

    let response = app
        .send(empty_request("POST", "/api/v1/orders", Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body, json!({"error": "Cart is empty"}));
}

#[tokio::test]
async fn test_order_consumes_cart() {
    let app = TestApp::seeded().await;
    let token = app.login().await;

    for (product_id, quantity) in [("1", 1), ("5", 3)] {
        app.send(json_request(
            "POST",
            "/api/v1/cart/items",
            &json!({"product_id": product_id, "quantity": quantity}),
            Some(&token),
        ))
        .await;
    }

    let order = app
        .send(json_request("POST", "/api/v1/orders", &json!({}), Some(&token)))
        .await;

    assert_eq!(order.status, StatusCode::OK);
    assert_eq!(order.body["status"], "confirmed");
    assert_eq!(order.body["user_id"], "demo_user");
    assert_eq!(
        order.body["items"],
        json!([
            {"product_id": "1", "quantity": 1},
            {"product_id": "5", "quantity": 3},
        ])
    );
    assert!(order.body["created_at"].is_string());

    let cart = app
        .send(empty_request("GET", "/api/v1/cart", Some(&token)))
        .await;
    assert_eq!(cart.body, json!([]));

    let history = app
        .send(empty_request("GET", "/api/v1/orders", Some(&token)))
        .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body, json!([order.body]));
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_memory_store() {
    let app = TestApp::seeded().await;

    let health = app.send(empty_request("GET", "/health", None)).await;
    let ready = app.send(empty_request("GET", "/health/ready", None)).await;

    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
    assert_eq!(health.body["service"], "cloudmart-api");
    assert_eq!(health.body["database"], "memory");
    assert_eq!(health.body["db_status"], "connected");
    assert_eq!(health.body["deployed_via"], "test");
    assert!(health.body["version"].is_string());
    assert!(health.body["build_time"].is_string());
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let app = TestApp::seeded().await;

    let ok = app.send(empty_request("GET", "/health", None)).await;
    let rejected = app.send(empty_request("GET", "/api/v1/cart", None)).await;

    assert!(ok.headers.contains_key("x-request-id"));
    assert!(rejected.headers.contains_key("x-request-id"));
}
