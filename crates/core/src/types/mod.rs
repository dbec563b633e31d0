//! Core types for the Regenessa storefront.
//!
//! Wire names follow the backend API's camelCase JSON contract.

pub mod email;
pub mod intent;
pub mod line;
pub mod order;
pub mod shipping;

pub use email::{Email, EmailError};
pub use intent::PendingOrderIntent;
pub use line::{CartLine, cart_count, cart_total};
pub use order::{Order, OrderStatus, Product};
pub use shipping::{ShippingDetails, ShippingError};
