//! Regenessa Core - shared domain types.
//!
//! This crate provides the common types used across the Regenessa
//! storefront components:
//! - `storefront` - the client engine (cart, checkout, verification)
//! - `integration-tests` - end-to-end tests against a mock backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure pricing logic - no I/O,
//! no HTTP clients. The one piece of business logic that lives here is
//! the set-deal effective-price rule, because it must be computable and
//! testable in total isolation.
//!
//! # Modules
//!
//! - [`types`] - Cart lines, pricing, shipping, orders, products, and
//!   the pending order intent

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
