//! User profile as issued by the authentication service.

use serde::{Deserialize, Serialize};

use regenessa_core::Email;

/// The signed-in user's profile, persisted in durable storage alongside
/// the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user id.
    pub id: String,
    /// User's full name (pre-fills the checkout form).
    pub full_name: String,
    /// User's email address.
    pub email: Email,
    /// Contact phone, when the user provided one at signup.
    #[serde(default)]
    pub phone: Option<String>,
}
