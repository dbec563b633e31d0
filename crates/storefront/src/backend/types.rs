//! Wire types for the backend API.
//!
//! Field names follow the backend's camelCase JSON contract, except the
//! payment-initialization response which keeps the gateway's snake_case
//! `tx_ref`. These types derive both `Serialize` and `Deserialize` so
//! the integration-test mock backend can speak the same contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use regenessa_core::{CartLine, Email, ShippingDetails};

/// Response shape for every cart read and mutation: the server's
/// authoritative item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemsResponse {
    pub items: Vec<CartLine>,
}

/// Body for `POST /cart/bulk-add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAddRequest {
    pub items: Vec<CartLine>,
}

/// Body for `PUT /cart/item/:productId`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: u32,
}

/// Response from the payment-proof upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}

/// Body for `POST /orders/checkout` (manual bank-transfer path).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    pub total_amount: Decimal,
    pub shipping_details: ShippingDetails,
    pub payment_method: String,
    pub payment_proof_url: String,
}

/// Response from `POST /orders/checkout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
}

/// Body for `POST /payment/initialize` (gateway path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitRequest {
    pub amount: Decimal,
    pub email: Email,
    pub name: String,
    pub phone: String,
}

/// Response from `POST /payment/initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitResponse {
    /// Gateway transaction reference (snake_case per gateway convention).
    pub tx_ref: String,
    /// Hosted payment page to redirect the browser to.
    pub link: String,
}

/// Body for `POST /orders` (gateway-path finalization).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeOrderRequest {
    pub items: Vec<CartLine>,
    pub total_amount: Decimal,
    pub shipping_details: ShippingDetails,
    pub transaction_id: String,
}

/// Response from `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeOrderResponse {
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Error body the backend returns on failure: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
