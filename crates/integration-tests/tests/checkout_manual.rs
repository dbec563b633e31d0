//! Manual bank-transfer checkout: receipt upload, order creation, and
//! the validation that runs before any network call.

use rust_decimal::Decimal;

use regenessa_integration_tests::{TestContext, product, shipping};
use regenessa_storefront::backend::ReceiptUpload;
use regenessa_storefront::cart::CartStore;
use regenessa_storefront::checkout::place_manual_order;
use regenessa_storefront::error::AppError;

fn receipt() -> ReceiptUpload {
    ReceiptUpload {
        file_name: "transfer.png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

#[tokio::test]
async fn test_manual_order_end_to_end() {
    let ctx = TestContext::new().await;
    ctx.mock().next_order_id = Some("abc12345-6789-dead-beef".to_string());

    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 2000), 5)
        .await
        .expect("add");

    let confirmation = place_manual_order(
        &ctx.backend,
        &ctx.session,
        &mut cart,
        &shipping(),
        Some(receipt()),
    )
    .await
    .expect("place order");

    assert_eq!(confirmation.display_id(), "ABC12345");
    assert!(cart.lines().is_empty());

    let mock = ctx.mock();
    assert_eq!(mock.upload_calls, 1);
    assert_eq!(mock.checkout_calls, 1);
    assert_eq!(mock.clear_calls, 1);
    assert!(mock.cart.is_empty());

    let order = mock.orders.first().expect("order recorded");
    assert_eq!(order.total_amount, Decimal::from(10000));
    assert_eq!(order.payment_method.as_deref(), Some("Bank Transfer"));
    assert!(order.payment_proof_url.is_some());
    assert_eq!(order.transaction_id, None);
}

#[tokio::test]
async fn test_missing_receipt_blocks_before_any_request() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 2000), 1)
        .await
        .expect("add");

    let result =
        place_manual_order(&ctx.backend, &ctx.session, &mut cart, &shipping(), None).await;

    assert!(matches!(result, Err(AppError::MissingReceipt)));
    let mock = ctx.mock();
    assert_eq!(mock.upload_calls, 0);
    assert_eq!(mock.checkout_calls, 0);
    // Cart untouched: the user fixes the form and retries.
    assert_eq!(cart.count(), 1);
}

#[tokio::test]
async fn test_empty_cart_blocks_before_any_request() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();

    let result = place_manual_order(
        &ctx.backend,
        &ctx.session,
        &mut cart,
        &shipping(),
        Some(receipt()),
    )
    .await;

    assert!(matches!(result, Err(AppError::EmptyCart)));
    assert_eq!(ctx.mock().upload_calls, 0);
}

#[tokio::test]
async fn test_checkout_failure_leaves_cart_intact() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 2000), 3)
        .await
        .expect("add");
    ctx.mock().fail_checkout = true;

    let result = place_manual_order(
        &ctx.backend,
        &ctx.session,
        &mut cart,
        &shipping(),
        Some(receipt()),
    )
    .await;

    let err = result.expect_err("checkout should fail");
    assert_eq!(err.user_message(), "Order submission failed");
    assert_eq!(cart.count(), 3);
    assert!(ctx.mock().orders.is_empty());
}
