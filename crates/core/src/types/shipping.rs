//! Shipping details, validated at construction.
//!
//! The checkout form submits these as one record. Required fields are
//! enforced when the record is built, not at submission time, so an
//! order request can never carry a half-filled address.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;

/// Errors that can occur when building [`ShippingDetails`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ShippingError {
    /// A required field is empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Delivery contact and address for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    /// Recipient's full name.
    pub full_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Detailed delivery address.
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Contact email; optional on the manual bank-transfer path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

impl ShippingDetails {
    /// Build shipping details, requiring every field except email to be
    /// non-empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::MissingField`] naming the first field
    /// that is empty.
    pub fn new(
        full_name: &str,
        phone: &str,
        address: &str,
        city: &str,
        state: &str,
        email: Option<Email>,
    ) -> Result<Self, ShippingError> {
        Ok(Self {
            full_name: required(full_name, "full name")?,
            phone: required(phone, "phone number")?,
            address: required(address, "delivery address")?,
            city: required(city, "city")?,
            state: required(state, "state")?,
            email,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ShippingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShippingError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
