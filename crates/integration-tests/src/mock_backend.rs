//! In-process mock of the Regenessa backend API.
//!
//! Speaks the same wire contract as the real backend (camelCase JSON,
//! `{"error": "..."}` failure bodies, bearer-token auth) and keeps its
//! state behind an `Arc<Mutex<_>>` handle the tests share, so assertions
//! can inspect exactly what the client sent. Failure toggles
//! (`fail_finalize` and friends) let tests exercise the error paths
//! without a real network fault.

#![allow(clippy::unused_async)]
#![allow(clippy::needless_pass_by_value)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post, put};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use regenessa_core::{CartLine, Order, OrderStatus, Product};
use regenessa_storefront::backend::types::{
    BulkAddRequest, CartItemsResponse, CheckoutRequest, CheckoutResponse, ErrorBody,
    FinalizeOrderRequest, FinalizeOrderResponse, PaymentInitRequest, PaymentInitResponse,
    QuantityUpdate, UploadResponse,
};

/// Bearer token the mock accepts; anything else is a 401.
pub const TEST_TOKEN: &str = "test-session-token";

/// Mutable server-side state, shared between the router and the test.
#[derive(Debug, Default)]
pub struct MockState {
    /// Server-authoritative cart.
    pub cart: Vec<CartLine>,
    /// Orders created through either checkout path.
    pub orders: Vec<Order>,
    /// Catalog served by the product endpoints.
    pub products: Vec<Product>,
    /// Requests received by `POST /orders/checkout`.
    pub checkout_calls: u32,
    /// Requests received by `POST /orders` (finalization).
    pub finalize_calls: u32,
    /// Requests received by `DELETE /cart/clear`.
    pub clear_calls: u32,
    /// Requests received by the receipt upload endpoint.
    pub upload_calls: u32,
    /// Force the next checkout to fail with a 500.
    pub fail_checkout: bool,
    /// Force finalization to fail with a 500.
    pub fail_finalize: bool,
    /// Force cart clearing to fail with a 500.
    pub fail_clear: bool,
    /// Order id to assign to the next created order, instead of a UUID.
    pub next_order_id: Option<String>,
    /// Transaction ids already finalized; a repeat is a 409.
    pub used_transaction_ids: HashSet<String>,
}

/// Shared handle to the mock's state.
pub type SharedState = Arc<Mutex<MockState>>;

type ApiError = (StatusCode, Json<ErrorBody>);

/// Bind an ephemeral port, serve the mock in a background task, and
/// return the base URL (including the `/api` prefix) to point the
/// client at.
pub async fn spawn(state: SharedState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend listener");
    let addr = listener.local_addr().expect("mock backend local addr");

    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });

    format!("http://{addr}/api")
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/cart", get(get_cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/bulk-add", post(bulk_add))
        .route(
            "/api/cart/item/{product_id}",
            put(update_quantity).delete(remove_item),
        )
        .route("/api/cart/clear", delete(clear_cart))
        .route("/api/upload/payment-proof", post(upload_payment_proof))
        .route("/api/orders/checkout", post(checkout_order))
        .route("/api/payment/initialize", post(initialize_payment))
        .route("/api/orders", post(finalize_order))
        .route("/api/orders/my-orders", get(my_orders))
        .route("/api/products", get(list_products))
        .route("/api/products/{product_id}", get(get_product))
        .with_state(state)
}

fn lock(state: &SharedState) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn require_auth(headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = format!("Bearer {TEST_TOKEN}");
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "Please login"))
    }
}

fn merge_line(cart: &mut Vec<CartLine>, line: CartLine) {
    if let Some(existing) = cart
        .iter_mut()
        .find(|existing| existing.product_id == line.product_id)
    {
        existing.quantity += line.quantity;
    } else {
        cart.push(line);
    }
}

// =============================================================================
// Cart
// =============================================================================

async fn get_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<CartItemsResponse>, ApiError> {
    require_auth(&headers)?;
    let state = lock(&state);
    Ok(Json(CartItemsResponse {
        items: state.cart.clone(),
    }))
}

async fn add_to_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(line): Json<CartLine>,
) -> Result<Json<CartItemsResponse>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    merge_line(&mut state.cart, line);
    Ok(Json(CartItemsResponse {
        items: state.cart.clone(),
    }))
}

async fn bulk_add(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<BulkAddRequest>,
) -> Result<Json<CartItemsResponse>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    for line in request.items {
        merge_line(&mut state.cart, line);
    }
    Ok(Json(CartItemsResponse {
        items: state.cart.clone(),
    }))
}

async fn update_quantity(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
    Json(update): Json<QuantityUpdate>,
) -> Result<Json<CartItemsResponse>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    let Some(line) = state
        .cart
        .iter_mut()
        .find(|line| line.product_id == product_id)
    else {
        return Err(api_error(StatusCode::NOT_FOUND, "Item not found in cart"));
    };
    line.quantity = update.quantity;
    Ok(Json(CartItemsResponse {
        items: state.cart.clone(),
    }))
}

async fn remove_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<Json<CartItemsResponse>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    state.cart.retain(|line| line.product_id != product_id);
    Ok(Json(CartItemsResponse {
        items: state.cart.clone(),
    }))
}

async fn clear_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    state.clear_calls += 1;
    if state.fail_clear {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to clear cart",
        ));
    }
    state.cart.clear();
    Ok(Json(json!({"message": "Cart cleared"})))
}

// =============================================================================
// Checkout & payment
// =============================================================================

async fn upload_payment_proof(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<UploadResponse>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    state.upload_calls += 1;
    Ok(Json(UploadResponse {
        image_url: format!("https://cdn.regenessa.test/receipts/{}.png", Uuid::new_v4()),
    }))
}

async fn checkout_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    state.checkout_calls += 1;
    if state.fail_checkout {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Order submission failed",
        ));
    }

    let order_id = state
        .next_order_id
        .take()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    state.orders.push(Order {
        id: order_id.clone(),
        items: request.items,
        total_amount: request.total_amount,
        shipping_details: request.shipping_details,
        status: OrderStatus::Pending,
        transaction_id: None,
        payment_proof_url: Some(request.payment_proof_url),
        payment_method: Some(request.payment_method),
        order_date: Utc::now(),
    });

    Ok(Json(CheckoutResponse { order_id }))
}

async fn initialize_payment(
    State(_state): State<SharedState>,
    headers: HeaderMap,
    Json(_request): Json<PaymentInitRequest>,
) -> Result<Json<PaymentInitResponse>, ApiError> {
    require_auth(&headers)?;
    let tx_ref = format!("REG-{}", Uuid::new_v4());
    Ok(Json(PaymentInitResponse {
        link: format!("https://checkout.gateway.test/pay/{tx_ref}"),
        tx_ref,
    }))
}

async fn finalize_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<FinalizeOrderRequest>,
) -> Result<Json<FinalizeOrderResponse>, ApiError> {
    require_auth(&headers)?;
    let mut state = lock(&state);
    state.finalize_calls += 1;
    if state.fail_finalize {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Order submission failed",
        ));
    }
    if !state
        .used_transaction_ids
        .insert(request.transaction_id.clone())
    {
        return Err(api_error(
            StatusCode::CONFLICT,
            "This transaction has already been processed",
        ));
    }

    let order_id = state
        .next_order_id
        .take()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    state.orders.push(Order {
        id: order_id.clone(),
        items: request.items,
        total_amount: request.total_amount,
        shipping_details: request.shipping_details,
        status: OrderStatus::Pending,
        transaction_id: Some(request.transaction_id),
        payment_proof_url: None,
        payment_method: Some("Card Payment".to_string()),
        order_date: Utc::now(),
    });

    Ok(Json(FinalizeOrderResponse {
        order_id: Some(order_id),
    }))
}

async fn my_orders(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Order>>, ApiError> {
    require_auth(&headers)?;
    let state = lock(&state);
    Ok(Json(state.orders.clone()))
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_products(State(state): State<SharedState>) -> Json<Vec<Product>> {
    let state = lock(&state);
    Json(state.products.clone())
}

async fn get_product(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let state = lock(&state);
    state
        .products
        .iter()
        .find(|product| product.id == product_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Product not found"))
}
