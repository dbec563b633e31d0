//! Unified error handling for the storefront client.
//!
//! Every operation the UI can trigger returns `Result<T, AppError>`, and
//! every `AppError` maps to a user-visible message via
//! [`AppError::user_message`] - there is no silent failure path. Server
//! errors surface the backend's own message when it provides one.

use thiserror::Error;

use regenessa_core::ShippingError;

use crate::backend::BackendError;
use crate::storage::StoreError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Durable client storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Input failed validation before any network call.
    #[error("Validation error: {0}")]
    Validation(#[from] ShippingError),

    /// A cart mutation was attempted without an authenticated session.
    #[error("Login required")]
    LoginRequired,

    /// Another request for this action is already in flight.
    #[error("Request already in flight")]
    Busy,

    /// Manual checkout was submitted without a payment receipt.
    #[error("Payment receipt missing")]
    MissingReceipt,

    /// Checkout was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,
}

impl AppError {
    /// The message to show the user (the toast contract).
    ///
    /// Backend errors pass through the server-provided message when one
    /// exists; everything else gets a short, non-technical message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(err) => err
                .server_message()
                .map_or_else(|| "Something went wrong. Please try again.".to_string(), String::from),
            Self::Storage(_) => "Could not save your progress. Please try again.".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::LoginRequired => "Please login to start shopping".to_string(),
            Self::Busy => "Hold on, still working on your last request".to_string(),
            Self::MissingReceipt => "Please upload your payment receipt".to_string(),
            Self::EmptyCart => "Your cart is empty".to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
