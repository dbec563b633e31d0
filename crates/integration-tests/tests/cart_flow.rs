//! Cart lifecycle against the mock backend: server-authoritative sync,
//! merge-by-product-id, the quantity floor, and local reset on logout.

use rust_decimal::Decimal;

use regenessa_integration_tests::{TestContext, deal_product, product};
use regenessa_storefront::cart::CartStore;
use regenessa_storefront::error::AppError;

#[tokio::test]
async fn test_add_merges_by_product_id() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    let yam = product("p1", 12000);

    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &yam, 2)
        .await
        .expect("first add");
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &yam, 3)
        .await
        .expect("second add");

    // One line, summed quantity - both locally and server-side.
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.count(), 5);
    let mock = ctx.mock();
    assert_eq!(mock.cart.len(), 1);
    assert_eq!(mock.cart.first().map(|line| line.quantity), Some(5));
}

#[tokio::test]
async fn test_add_opens_panel_and_uses_server_state() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();

    assert!(!cart.is_open());
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 5000), 1)
        .await
        .expect("add");
    assert!(cart.is_open());
    assert_eq!(cart.total(), Decimal::from(5000));
}

#[tokio::test]
async fn test_add_without_session_fails_before_network() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();

    let result = cart
        .add_to_cart(&ctx.backend, None, &product("p1", 5000), 1)
        .await;

    assert!(matches!(result, Err(AppError::LoginRequired)));
    assert!(ctx.mock().cart.is_empty());
}

#[tokio::test]
async fn test_set_deal_pricing_flows_through_sync() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    // 1000 each, or 800 each from 5 units.
    let oil = deal_product("p2", 1000, 800, 5);

    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &oil, 4)
        .await
        .expect("add below threshold");
    assert_eq!(cart.total(), Decimal::from(4000));

    cart.update_quantity(&ctx.backend, &ctx.session, "p2", 5)
        .await
        .expect("reach threshold");
    assert_eq!(cart.total(), Decimal::from(4000));
}

#[tokio::test]
async fn test_update_quantity_below_one_is_a_no_op() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 5000), 2)
        .await
        .expect("add");

    cart.update_quantity(&ctx.backend, &ctx.session, "p1", 0)
        .await
        .expect("no-op");

    assert_eq!(cart.count(), 2);
    assert_eq!(ctx.mock().cart.first().map(|line| line.quantity), Some(2));
}

#[tokio::test]
async fn test_remove_deletes_the_line() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 5000), 2)
        .await
        .expect("add p1");
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p2", 1000), 1)
        .await
        .expect("add p2");

    cart.remove(&ctx.backend, &ctx.session, "p1")
        .await
        .expect("remove p1");

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(
        cart.lines().first().map(|line| line.product_id.as_str()),
        Some("p2")
    );
}

#[tokio::test]
async fn test_bulk_add_merges_bundle_into_existing_cart() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 5000), 2)
        .await
        .expect("seed cart");

    cart.add_multiple(
        &ctx.backend,
        Some(&ctx.session),
        &[product("p1", 5000), product("p3", 700)],
    )
    .await
    .expect("bulk add");

    // p1 merged (2 + 1), p3 appended at quantity 1.
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.count(), 4);
}

#[tokio::test]
async fn test_sync_without_session_resets_locally() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 5000), 2)
        .await
        .expect("add");

    cart.sync(&ctx.backend, None).await.expect("logout sync");

    assert!(cart.lines().is_empty());
    assert!(!cart.is_open());
    // Purely local: no clear request reached the server.
    assert_eq!(ctx.mock().clear_calls, 0);
}

#[tokio::test]
async fn test_clear_forces_local_empty_even_when_server_fails() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 5000), 2)
        .await
        .expect("add");
    ctx.mock().fail_clear = true;

    cart.clear(&ctx.backend, Some(&ctx.session)).await;

    assert!(cart.lines().is_empty());
    assert_eq!(ctx.mock().clear_calls, 1);
}
