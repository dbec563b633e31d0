//! Integration-test harness for the Regenessa storefront client.
//!
//! Every test builds its own [`TestContext`]: an in-process mock backend
//! on an ephemeral port, a temporary durable store, and an authenticated
//! session already persisted to it. Tests drive the real client code
//! (cart store, checkout orchestration, verification handshake) against
//! the mock and then assert on what the mock actually received.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod mock_backend;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use secrecy::SecretString;
use tempfile::TempDir;

use regenessa_core::{Email, Product, ShippingDetails};
use regenessa_storefront::backend::BackendClient;
use regenessa_storefront::config::StorefrontConfig;
use regenessa_storefront::models::{AuthSession, UserProfile};
use regenessa_storefront::storage::ClientStore;

use mock_backend::{MockState, SharedState, TEST_TOKEN};

/// One isolated test environment: client, store, session, and a handle
/// to the mock backend's state.
pub struct TestContext {
    /// Client pointed at the mock backend.
    pub backend: BackendClient,
    /// Durable store backed by a temp directory.
    pub store: ClientStore,
    /// Authenticated session the mock accepts.
    pub session: AuthSession,
    /// Handle to the mock backend's state.
    pub state: SharedState,
    _storage_dir: TempDir,
}

impl TestContext {
    /// Spin up a fresh mock backend and client pair.
    pub async fn new() -> Self {
        let state: SharedState = Arc::new(Mutex::new(MockState::default()));
        let base_url = mock_backend::spawn(Arc::clone(&state)).await;

        let storage_dir = TempDir::new().expect("create temp storage dir");
        let config = StorefrontConfig::with_backend(&base_url, storage_dir.path());
        let backend = BackendClient::new(&config);
        let store = ClientStore::open(storage_dir.path()).expect("open client store");

        let user = UserProfile {
            id: "user-1".to_string(),
            full_name: "Ada Obi".to_string(),
            email: Email::parse("ada@example.com").expect("valid email"),
            phone: Some("+2348012345678".to_string()),
        };
        let session = AuthSession::new(SecretString::from(TEST_TOKEN), user);
        session.persist(&store).expect("persist session");

        Self {
            backend,
            store,
            session,
            state,
            _storage_dir: storage_dir,
        }
    }

    /// Lock the mock backend's state for inspection or setup.
    ///
    /// Never hold the guard across an `await`; the mock's handlers take
    /// the same lock.
    pub fn mock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A plain catalog product with no set deal.
#[must_use]
pub fn product(id: &str, price: u32) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        price: Decimal::from(price),
        set_price: None,
        set_quantity: None,
        unit: Some("25L Jerrycan".to_string()),
        image_url: None,
        moq: None,
        description: None,
    }
}

/// A catalog product carrying a set deal.
#[must_use]
pub fn deal_product(id: &str, price: u32, set_price: u32, set_quantity: u32) -> Product {
    Product {
        set_price: Some(Decimal::from(set_price)),
        set_quantity: Some(set_quantity),
        ..product(id, price)
    }
}

/// Valid shipping details for checkout calls.
#[must_use]
pub fn shipping() -> ShippingDetails {
    ShippingDetails::new(
        "Ada Obi",
        "+2348012345678",
        "14 Marina Road",
        "Lagos",
        "Lagos",
        None,
    )
    .expect("valid shipping details")
}
