//! The pending order intent.
//!
//! A hosted-gateway checkout is a hard navigation away from the app:
//! nothing in memory survives the redirect. This record, persisted to
//! durable client storage immediately before the redirect, is the only
//! way to reconstruct "what was this transaction for" when the gateway
//! sends the user back. It is consumed exactly once on successful
//! reconciliation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::line::CartLine;
use crate::types::shipping::ShippingDetails;

/// Snapshot of a checkout persisted across the gateway redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrderIntent {
    /// Cart lines at the moment of redirect.
    pub items: Vec<CartLine>,
    /// Total computed from effective prices at the moment of redirect.
    pub total_amount: Decimal,
    /// Shipping details collected before the redirect.
    pub shipping_details: ShippingDetails,
    /// Transaction reference issued by the payment initialization call.
    /// Keeps the gateway's snake_case spelling on the wire.
    #[serde(rename = "tx_ref")]
    pub tx_ref: String,
}
