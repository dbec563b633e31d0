//! Cart lines and set-deal pricing.
//!
//! A set deal is a per-product promotional price that unlocks once the
//! line's quantity reaches a minimum threshold. The effective price is
//! recomputed on every read - it is never cached on the line, so a
//! quantity change that crosses the threshold changes the price
//! immediately.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::order::Product;

/// One product's presence in the cart.
///
/// Invariants:
/// - `quantity` is always >= 1; a line reduced below 1 is removed,
///   never persisted at 0.
/// - `product_id` is unique within a cart; the backend merges adds by
///   product id rather than duplicating lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Stable product identity, unique key within a cart.
    pub product_id: String,
    /// Product name (display only).
    pub name: String,
    /// Product image URL (display only).
    #[serde(default)]
    pub image_url: Option<String>,
    /// Sales unit, e.g. "50kg Bag" (display only).
    pub unit: String,
    /// Base unit price at the time the product was added.
    pub price: Decimal,
    /// Discounted per-unit price once `set_quantity` is reached.
    #[serde(default)]
    pub set_price: Option<Decimal>,
    /// Minimum quantity to unlock `set_price`.
    #[serde(default)]
    pub set_quantity: Option<u32>,
    /// Units of this product in the cart.
    pub quantity: u32,
}

impl CartLine {
    /// Build a cart line from a catalog product.
    ///
    /// Carries the set-pricing fields so the line can resolve its own
    /// effective price as its quantity changes.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            unit: product
                .unit
                .clone()
                .unwrap_or_else(|| "Unit".to_string()),
            price: product.price,
            set_price: product.set_price,
            set_quantity: product.set_quantity,
            quantity,
        }
    }

    /// The per-unit price actually charged for this line.
    ///
    /// Returns the set price when both set-deal fields are present and
    /// positive and the quantity has reached the threshold; otherwise
    /// the base price. Pure and deterministic.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        if let (Some(set_price), Some(set_quantity)) = (self.set_price, self.set_quantity)
            && set_price > Decimal::ZERO
            && set_quantity > 0
            && self.quantity >= set_quantity
        {
            return set_price;
        }
        self.price
    }

    /// Effective price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.effective_price() * Decimal::from(self.quantity)
    }
}

/// Total value of a cart: the sum of every line's subtotal.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::subtotal).sum()
}

/// Total number of units in a cart: the sum of every line's quantity.
#[must_use]
pub fn cart_count(lines: &[CartLine]) -> u32 {
    lines.iter().map(|line| line.quantity).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(price: u32, set_price: Option<u32>, set_quantity: Option<u32>, quantity: u32) -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            name: "Royal Stallion Rice".to_string(),
            image_url: None,
            unit: "50kg Bag".to_string(),
            price: Decimal::from(price),
            set_price: set_price.map(Decimal::from),
            set_quantity,
            quantity,
        }
    }

    #[test]
    fn test_effective_price_below_threshold() {
        let line = line(1000, Some(800), Some(5), 4);
        assert_eq!(line.effective_price(), Decimal::from(1000));
    }

    #[test]
    fn test_effective_price_at_threshold() {
        let line = line(1000, Some(800), Some(5), 5);
        assert_eq!(line.effective_price(), Decimal::from(800));
    }

    #[test]
    fn test_effective_price_above_threshold() {
        let line = line(1000, Some(800), Some(5), 10);
        assert_eq!(line.effective_price(), Decimal::from(800));
    }

    #[test]
    fn test_effective_price_no_deal_fields() {
        let line = line(1000, None, None, 50);
        assert_eq!(line.effective_price(), Decimal::from(1000));
    }

    #[test]
    fn test_effective_price_zero_deal_fields_ignored() {
        // A zero set price or threshold never unlocks the deal.
        let zero_price = line(1000, Some(0), Some(5), 10);
        assert_eq!(zero_price.effective_price(), Decimal::from(1000));

        let zero_quantity = line(1000, Some(800), Some(0), 10);
        assert_eq!(zero_quantity.effective_price(), Decimal::from(1000));
    }

    #[test]
    fn test_effective_price_one_deal_field_missing() {
        let no_threshold = line(1000, Some(800), None, 10);
        assert_eq!(no_threshold.effective_price(), Decimal::from(1000));

        let no_set_price = line(1000, None, Some(5), 10);
        assert_eq!(no_set_price.effective_price(), Decimal::from(1000));
    }

    #[test]
    fn test_subtotal_uses_effective_price() {
        let line = line(1000, Some(800), Some(5), 5);
        assert_eq!(line.subtotal(), Decimal::from(4000));
    }

    #[test]
    fn test_cart_total_mixed_lines() {
        let lines = vec![
            line(1000, Some(800), Some(5), 5), // 4000 at set price
            line(5000, None, None, 2),         // 10000 at base price
        ];
        assert_eq!(cart_total(&lines), Decimal::from(14000));
    }

    #[test]
    fn test_cart_total_is_pure() {
        let lines = vec![line(1000, Some(800), Some(5), 5)];
        assert_eq!(cart_total(&lines), cart_total(&lines));
    }

    #[test]
    fn test_cart_count() {
        let lines = vec![line(1000, None, None, 3), line(5000, None, None, 2)];
        assert_eq!(cart_count(&lines), 5);
        assert_eq!(cart_count(&[]), 0);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(line(1000, Some(800), Some(5), 5)).unwrap();
        assert!(json.get("productId").is_some());
        assert!(json.get("setPrice").is_some());
        assert!(json.get("setQuantity").is_some());
        assert!(json.get("imageUrl").is_some());
    }

    #[test]
    fn test_deserializes_without_deal_fields() {
        let line: CartLine = serde_json::from_str(
            r#"{"productId":"p2","name":"Honey Beans","unit":"50kg Bag","price":"45000","quantity":1}"#,
        )
        .unwrap();
        assert_eq!(line.set_price, None);
        assert_eq!(line.set_quantity, None);
        assert_eq!(line.effective_price(), Decimal::from(45000));
    }
}
