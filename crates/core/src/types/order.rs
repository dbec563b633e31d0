//! Orders and catalog products.
//!
//! Orders are server-owned; the client only reads them back from the
//! order-history endpoint. Products are catalog items carrying the
//! set-deal fields that flow onto cart lines.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::line::CartLine;
use crate::types::shipping::ShippingDetails;

/// Order lifecycle status, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Rejected,
}

/// A placed order, read back from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned order id.
    pub id: String,
    /// Line items as submitted at checkout.
    pub items: Vec<CartLine>,
    /// Total charged, computed from effective prices at submission.
    pub total_amount: Decimal,
    /// Delivery details as submitted at checkout.
    pub shipping_details: ShippingDetails,
    /// Current fulfillment status.
    pub status: OrderStatus,
    /// Gateway transaction reference (gateway path only).
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Uploaded receipt URL (manual bank-transfer path only).
    #[serde(default)]
    pub payment_proof_url: Option<String>,
    /// How the order was paid, e.g. "Bank Transfer".
    #[serde(default)]
    pub payment_method: Option<String>,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable product id.
    pub id: String,
    /// Product name.
    pub name: String,
    /// Base unit price.
    pub price: Decimal,
    /// Discounted per-unit price once `set_quantity` is reached.
    #[serde(default)]
    pub set_price: Option<Decimal>,
    /// Minimum quantity to unlock `set_price`.
    #[serde(default)]
    pub set_quantity: Option<u32>,
    /// Sales unit, e.g. "25L Jerrycan".
    #[serde(default)]
    pub unit: Option<String>,
    /// Product image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Minimum order quantity, display string (e.g. "5 Bags").
    #[serde(default)]
    pub moq: Option<String>,
    /// Short marketing description.
    #[serde(default)]
    pub description: Option<String>,
}
