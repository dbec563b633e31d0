//! Authenticated session state.
//!
//! Session issuance is an external collaborator: the login flow stores a
//! token and profile in durable storage, and this module loads them back.
//! There is no session means the cart must be reset locally and every
//! cart mutation blocked client-side before any network call.

use secrecy::SecretString;

use crate::models::UserProfile;
use crate::storage::{ClientStore, StoreError, keys};

/// An authenticated session: bearer token plus the user it belongs to.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct AuthSession {
    token: SecretString,
    /// The signed-in user's profile.
    pub user: UserProfile,
}

impl AuthSession {
    /// Build a session from a token and profile.
    #[must_use]
    pub const fn new(token: SecretString, user: UserProfile) -> Self {
        Self { token, user }
    }

    /// The bearer token for backend calls.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Load the session from durable storage.
    ///
    /// Returns `None` unless both the token and the profile are present,
    /// mirroring the login flow which always writes both.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn load(store: &ClientStore) -> Result<Option<Self>, StoreError> {
        let token: Option<String> = store.get(keys::TOKEN)?;
        let user: Option<UserProfile> = store.get(keys::USER)?;

        Ok(match (token, user) {
            (Some(token), Some(user)) => Some(Self::new(SecretString::from(token), user)),
            _ => None,
        })
    }

    /// Persist the session to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn persist(&self, store: &ClientStore) -> Result<(), StoreError> {
        use secrecy::ExposeSecret;
        store.put(keys::TOKEN, &self.token.expose_secret())?;
        store.put(keys::USER, &self.user)?;
        Ok(())
    }

    /// Remove the session from durable storage (logout).
    ///
    /// The caller is responsible for resetting the cart locally; logout
    /// never triggers a network call.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn clear(store: &ClientStore) -> Result<(), StoreError> {
        store.remove(keys::TOKEN)?;
        store.remove(keys::USER)?;
        Ok(())
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}
