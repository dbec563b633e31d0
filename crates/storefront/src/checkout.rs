//! Checkout orchestration.
//!
//! Two payment paths share the same inputs (the current cart plus
//! validated shipping details) but different shapes:
//!
//! - **Manual bank transfer**: one client-to-server round trip - upload
//!   the receipt, create the order, clear the cart. Nothing is persisted
//!   client-side because nothing outlives the call stack.
//! - **Hosted gateway**: initialize payment, persist a
//!   [`PendingOrderIntent`], and hand back the hosted payment link. The
//!   redirect is a hard navigation; the intent is the only state that
//!   survives it, and the cart is deliberately left intact until the
//!   verification handshake confirms the order.

use tracing::instrument;

use regenessa_core::{PendingOrderIntent, ShippingDetails};

use crate::backend::types::{CheckoutRequest, PaymentInitRequest};
use crate::backend::{BackendClient, ReceiptUpload};
use crate::cart::CartStore;
use crate::error::{AppError, Result};
use crate::models::AuthSession;
use crate::storage::{ClientStore, keys};

/// Payment method label the backend expects on the manual path.
const BANK_TRANSFER: &str = "Bank Transfer";

/// A successfully created order, ready to display.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    /// Server-assigned order id.
    pub order_id: String,
}

impl OrderConfirmation {
    /// Short display form of the order id: first 8 characters,
    /// uppercased (e.g. `abc12345-…` shows as `ABC12345`).
    #[must_use]
    pub fn display_id(&self) -> String {
        self.order_id.chars().take(8).collect::<String>().to_uppercase()
    }
}

/// Where to send the browser for a hosted-gateway payment.
#[derive(Debug, Clone)]
pub struct GatewayRedirect {
    /// Hosted payment page URL.
    pub link: String,
    /// Transaction reference tied to the persisted intent.
    pub tx_ref: String,
}

/// Place an order on the manual bank-transfer path.
///
/// Validation happens before any request: the receipt must be attached
/// and the cart non-empty (shipping details are valid by construction).
/// On success the cart is cleared; on failure at any step the cart is
/// left intact so the user can retry.
///
/// # Errors
///
/// Returns [`AppError::MissingReceipt`] or [`AppError::EmptyCart`]
/// before any network call, or the backend error from the upload or
/// order-creation step.
#[instrument(skip_all)]
pub async fn place_manual_order(
    backend: &BackendClient,
    session: &AuthSession,
    cart: &mut CartStore,
    shipping: &ShippingDetails,
    receipt: Option<ReceiptUpload>,
) -> Result<OrderConfirmation> {
    let Some(receipt) = receipt else {
        return Err(AppError::MissingReceipt);
    };
    if cart.lines().is_empty() {
        return Err(AppError::EmptyCart);
    }

    let payment_proof_url = backend.upload_payment_proof(session, &receipt).await?;

    let request = CheckoutRequest {
        items: cart.lines().to_vec(),
        total_amount: cart.total(),
        shipping_details: shipping.clone(),
        payment_method: BANK_TRANSFER.to_string(),
        payment_proof_url,
    };
    let response = backend.checkout_order(session, &request).await?;

    cart.clear(backend, Some(session)).await;

    Ok(OrderConfirmation {
        order_id: response.order_id,
    })
}

/// Begin a hosted-gateway checkout.
///
/// Computes the total from the current cart, requests a payment link,
/// and persists a [`PendingOrderIntent`] carrying the returned `tx_ref`
/// *before* handing back the link - once the browser navigates away,
/// the intent is all that's left. The cart is not cleared here.
///
/// A fresh call always generates a fresh `tx_ref` and overwrites any
/// stale intent from an earlier abandoned attempt.
///
/// # Errors
///
/// Returns [`AppError::EmptyCart`] before any network call, the backend
/// error from payment initialization, or a storage error persisting the
/// intent.
#[instrument(skip_all)]
pub async fn begin_gateway_checkout(
    backend: &BackendClient,
    session: &AuthSession,
    cart: &CartStore,
    store: &ClientStore,
    shipping: &ShippingDetails,
) -> Result<GatewayRedirect> {
    if cart.lines().is_empty() {
        return Err(AppError::EmptyCart);
    }

    let total_amount = cart.total();
    let email = shipping
        .email
        .clone()
        .unwrap_or_else(|| session.user.email.clone());

    let init = backend
        .initialize_payment(
            session,
            &PaymentInitRequest {
                amount: total_amount,
                email,
                name: shipping.full_name.clone(),
                phone: shipping.phone.clone(),
            },
        )
        .await?;

    let intent = PendingOrderIntent {
        items: cart.lines().to_vec(),
        total_amount,
        shipping_details: shipping.clone(),
        tx_ref: init.tx_ref.clone(),
    };
    store.put(keys::PENDING_ORDER, &intent)?;

    Ok(GatewayRedirect {
        link: init.link,
        tx_ref: init.tx_ref,
    })
}
