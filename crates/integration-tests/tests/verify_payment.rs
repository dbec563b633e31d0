//! Payment verification handshake: one finalization per redirect
//! return, no matter how many times the handler re-fires.

use regenessa_core::PendingOrderIntent;
use regenessa_integration_tests::{TestContext, product, shipping};
use regenessa_storefront::cart::CartStore;
use regenessa_storefront::checkout::begin_gateway_checkout;
use regenessa_storefront::storage::keys;
use regenessa_storefront::verify::{PaymentVerifier, VerifyOutcome, VerifyStatus};

/// Drive a gateway checkout far enough that an intent is on disk and
/// the cart holds items, then return the redirect's `tx_ref`.
async fn prepare_gateway_order(ctx: &TestContext, cart: &mut CartStore) -> String {
    cart.add_to_cart(&ctx.backend, Some(&ctx.session), &product("p1", 2000), 5)
        .await
        .expect("add");
    let redirect = begin_gateway_checkout(&ctx.backend, &ctx.session, cart, &ctx.store, &shipping())
        .await
        .expect("begin checkout");
    redirect.tx_ref
}

#[tokio::test]
async fn test_successful_verification_finalizes_and_clears() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    let tx_ref = prepare_gateway_order(&ctx, &mut cart).await;

    let verifier = PaymentVerifier::new();
    let query = format!("status=successful&transaction_id={tx_ref}");
    let outcome = verifier
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;

    let VerifyOutcome::Success { order_id } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(order_id.is_some());
    assert_eq!(verifier.status(), VerifyStatus::Success);

    // Cart cleared on both sides, intent consumed.
    assert!(cart.lines().is_empty());
    let stored: Option<PendingOrderIntent> = ctx.store.get(keys::PENDING_ORDER).expect("read");
    assert!(stored.is_none());

    let mock = ctx.mock();
    assert_eq!(mock.finalize_calls, 1);
    assert!(mock.cart.is_empty());
    let order = mock.orders.first().expect("order recorded");
    assert_eq!(order.transaction_id.as_deref(), Some(tx_ref.as_str()));
}

#[tokio::test]
async fn test_reentry_is_swallowed_by_the_latch() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    let tx_ref = prepare_gateway_order(&ctx, &mut cart).await;

    let verifier = PaymentVerifier::new();
    let query = format!("status=successful&transaction_id={tx_ref}");

    let first = verifier
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;
    let second = verifier
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;

    assert!(matches!(first, VerifyOutcome::Success { .. }));
    assert_eq!(second, VerifyOutcome::AlreadyHandled);
    // Exactly one order-creation request reached the backend.
    let mock = ctx.mock();
    assert_eq!(mock.finalize_calls, 1);
    assert_eq!(mock.orders.len(), 1);
}

#[tokio::test]
async fn test_missing_transaction_param_fails_without_consuming_latch() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    let tx_ref = prepare_gateway_order(&ctx, &mut cart).await;

    let verifier = PaymentVerifier::new();
    let bad = verifier
        .verify(
            &ctx.backend,
            &ctx.session,
            &mut cart,
            &ctx.store,
            "status=cancelled",
        )
        .await;
    assert!(matches!(bad, VerifyOutcome::Failed { .. }));
    assert_eq!(ctx.mock().finalize_calls, 0);

    // Deliberate: a rejection before the latch leaves the handshake
    // unconsumed, so a later return with a real transaction id still
    // verifies (and moves the status out of Failed).
    let query = format!("transaction_id={tx_ref}");
    let good = verifier
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;
    assert!(matches!(good, VerifyOutcome::Success { .. }));
}

#[tokio::test]
async fn test_tx_ref_param_name_is_accepted() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    let tx_ref = prepare_gateway_order(&ctx, &mut cart).await;

    let verifier = PaymentVerifier::new();
    let query = format!("status=successful&tx_ref={tx_ref}");
    let outcome = verifier
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;

    assert!(matches!(outcome, VerifyOutcome::Success { .. }));
}

#[tokio::test]
async fn test_missing_intent_fails_toward_order_history() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();

    let verifier = PaymentVerifier::new();
    let outcome = verifier
        .verify(
            &ctx.backend,
            &ctx.session,
            &mut cart,
            &ctx.store,
            "transaction_id=TX-ORPHAN",
        )
        .await;

    let VerifyOutcome::Failed { message } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(message.contains("order history"));
    assert_eq!(verifier.status(), VerifyStatus::Failed);
    assert_eq!(ctx.mock().finalize_calls, 0);
}

#[tokio::test]
async fn test_finalization_failure_restores_intent_and_cart() {
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    let tx_ref = prepare_gateway_order(&ctx, &mut cart).await;
    ctx.mock().fail_finalize = true;

    let verifier = PaymentVerifier::new();
    let query = format!("transaction_id={tx_ref}");
    let outcome = verifier
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;

    let VerifyOutcome::Failed { message } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(message, "Order submission failed");

    // The intent went back for a retry and the cart was not cleared.
    let stored: Option<PendingOrderIntent> = ctx.store.get(keys::PENDING_ORDER).expect("read");
    assert_eq!(stored.map(|intent| intent.tx_ref), Some(tx_ref));
    assert_eq!(cart.count(), 5);
    assert!(ctx.mock().orders.is_empty());
}

#[tokio::test]
async fn test_duplicate_transaction_is_rejected_by_the_backend() {
    // Belt and braces behind the client latch: even a fresh verifier
    // (new page load) cannot double-create an order, because the
    // backend refuses a transaction id it has already finalized.
    let ctx = TestContext::new().await;
    let mut cart = CartStore::new();
    let tx_ref = prepare_gateway_order(&ctx, &mut cart).await;
    let query = format!("transaction_id={tx_ref}");

    let first = PaymentVerifier::new();
    let outcome = first
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;
    assert!(matches!(outcome, VerifyOutcome::Success { .. }));

    // Simulate a reload: new verifier, intent re-seeded somehow.
    let intent = PendingOrderIntent {
        items: Vec::new(),
        total_amount: rust_decimal::Decimal::from(10000),
        shipping_details: shipping(),
        tx_ref: tx_ref.clone(),
    };
    ctx.store
        .put(keys::PENDING_ORDER, &intent)
        .expect("re-seed intent");

    let second = PaymentVerifier::new();
    let outcome = second
        .verify(&ctx.backend, &ctx.session, &mut cart, &ctx.store, &query)
        .await;

    let VerifyOutcome::Failed { message } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(message.contains("already been processed"));
    assert_eq!(ctx.mock().orders.len(), 1);
}
