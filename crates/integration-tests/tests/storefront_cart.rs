//! Integration tests for the cart API.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use buycom_integration_tests::{TestContext, summary};

async fn add(ctx: &TestContext, id: i64, price: &str, quantity: u32) -> Value {
    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/cart/items",
            Some(json!({ "product": summary(id, price), "quantity": quantity })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn quantity_of(cart: &Value, id: i64) -> Option<i64> {
    cart["items"]
        .as_array()?
        .iter()
        .find(|item| item["id"] == id)
        .and_then(|item| item["quantity"].as_i64())
}

// =============================================================================
// Adding
// =============================================================================

#[tokio::test]
async fn test_add_is_additive() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$10.00", 1).await;
    let cart = add(&ctx, 1, "$10.00", 2).await;

    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(quantity_of(&cart, 1), Some(3));
}

#[tokio::test]
async fn test_add_zero_counts_as_one() {
    let ctx = TestContext::new();
    let cart = add(&ctx, 1, "$10.00", 0).await;
    assert_eq!(quantity_of(&cart, 1), Some(1));
}

#[tokio::test]
async fn test_cart_entries_are_flat_summaries() {
    let ctx = TestContext::new();
    let cart = add(&ctx, 5, "$2.50", 1).await;
    let entry = &cart["items"][0];

    assert_eq!(entry["id"], 5);
    assert_eq!(entry["price"], "$2.50");
    assert_eq!(entry["quantity"], 1);
    assert!(entry.get("product").is_none());
}

// =============================================================================
// Quantity updates
// =============================================================================

#[tokio::test]
async fn test_update_quantity_clamps_to_one() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$10.00", 4).await;

    for requested in [0, -5] {
        let (status, cart) = ctx
            .send(
                Method::PATCH,
                "/api/cart/items/1",
                Some(json!({ "quantity": requested })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quantity_of(&cart, 1), Some(1));
    }
}

#[tokio::test]
async fn test_update_missing_entry_is_noop() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$10.00", 1).await;

    let (status, cart) = ctx
        .send(
            Method::PATCH,
            "/api/cart/items/42",
            Some(json!({ "quantity": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(quantity_of(&cart, 42), None);
}

// =============================================================================
// Totals, removal and clearing
// =============================================================================

#[tokio::test]
async fn test_subtotal_and_item_count() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$10.00", 2).await;
    let cart = add(&ctx, 2, "$5.50", 1).await;

    assert_eq!(cart["subtotal"], "25.50");
    assert_eq!(cart["subtotalLabel"], "$25.50");
    assert_eq!(cart["itemCount"], 3);
}

#[tokio::test]
async fn test_unparseable_price_counts_as_zero() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$10.00", 1).await;
    let cart = add(&ctx, 2, "Free", 3).await;

    assert_eq!(cart["subtotalLabel"], "$10.00");
    assert_eq!(cart["itemCount"], 4);
}

#[tokio::test]
async fn test_remove_ignores_quantity() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$10.00", 5).await;

    let (status, cart) = ctx.send(Method::DELETE, "/api/cart/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["itemCount"], 0);

    let (status, _) = ctx.send(Method::DELETE, "/api/cart/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_clear_then_add_yields_single_entry() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$10.00", 1).await;
    add(&ctx, 2, "$5.00", 1).await;

    let (_, cart) = ctx.send(Method::DELETE, "/api/cart", None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);

    let cart = add(&ctx, 3, "$1.00", 1).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(quantity_of(&cart, 3), Some(1));
}

#[tokio::test]
async fn test_add_from_favorite() {
    let ctx = TestContext::new();
    ctx.send(
        Method::POST,
        "/api/favorites/toggle",
        Some(json!(summary(9, "$4.00"))),
    )
    .await;

    ctx.send(Method::POST, "/api/cart/from-favorite/9", None).await;
    let (_, cart) = ctx.send(Method::POST, "/api/cart/from-favorite/9", None).await;
    assert_eq!(quantity_of(&cart, 9), Some(2));

    let (status, cart) = ctx.send(Method::POST, "/api/cart/from-favorite/10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quantity_of(&cart, 10), None);
}

#[tokio::test]
async fn test_huge_subtotal_still_renders() {
    let ctx = TestContext::new();
    add(&ctx, 1, "$99999999999999999999.00", 1).await;

    let (status, _) = ctx
        .send(
            Method::PATCH,
            "/api/cart/items/1",
            Some(json!({ "quantity": i64::MAX })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, cart) = ctx.send(Method::GET, "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["itemCount"], u64::from(u32::MAX));
    assert_eq!(cart["subtotal"], "79228162514264337593543950335");
}
