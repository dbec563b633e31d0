//! The cart store: single source of cart truth for the UI.
//!
//! Every mutation round-trips through the backend and replaces local
//! state with the server's authoritative item list - never a locally
//! optimistic merge - so the client can't drift from server-side stock
//! and pricing rules. On failure the previous state is left untouched
//! and the caller surfaces a notification; no automatic retry.
//!
//! Known race, accepted: rapid-fire mutations are not serialized, and
//! the last *response* to arrive wins. A single `CartStore` owner can't
//! overlap calls (`&mut self`), but two stores over one account can.

use rust_decimal::Decimal;
use tracing::{instrument, warn};

use regenessa_core::{CartLine, Product, cart_count, cart_total};

use crate::backend::BackendClient;
use crate::error::{AppError, Result};
use crate::models::AuthSession;

/// In-memory cart state, synchronized with the backend.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    is_open: bool,
    busy: bool,
}

impl CartStore {
    /// Create an empty cart store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            is_open: false,
            busy: false,
        }
    }

    /// Current cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of quantities across all lines. Recomputed on every call.
    #[must_use]
    pub fn count(&self) -> u32 {
        cart_count(&self.lines)
    }

    /// Cart total under effective (set-deal) pricing. Recomputed on
    /// every call, never cached.
    #[must_use]
    pub fn total(&self) -> Decimal {
        cart_total(&self.lines)
    }

    /// Whether the cart panel is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Close the cart panel.
    pub const fn close_panel(&mut self) {
        self.is_open = false;
    }

    /// Whether a mutation is in flight (disables the triggering control).
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Refresh local state from the backend, or reset it locally when no
    /// session is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; local state is untouched.
    #[instrument(skip_all)]
    pub async fn sync(
        &mut self,
        backend: &BackendClient,
        session: Option<&AuthSession>,
    ) -> Result<()> {
        let Some(session) = session else {
            self.reset_local();
            return Ok(());
        };
        let items = backend.get_cart(session).await?;
        self.lines = items;
        Ok(())
    }

    /// Reset the cart locally without any network call.
    ///
    /// Called whenever the authenticated user becomes absent (logout or
    /// session expiry); the cart is never persisted across sign-outs
    /// client-side.
    pub fn reset_local(&mut self) {
        self.lines.clear();
        self.is_open = false;
    }

    /// Add a product to the cart, merging by product id server-side.
    ///
    /// Requires an authenticated session; without one this fails before
    /// any request is sent. On success the cart panel opens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LoginRequired`] without a session,
    /// [`AppError::Busy`] while another mutation is in flight, or the
    /// backend error; local state is untouched on failure.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub async fn add_to_cart(
        &mut self,
        backend: &BackendClient,
        session: Option<&AuthSession>,
        product: &Product,
        quantity: u32,
    ) -> Result<()> {
        let Some(session) = session else {
            return Err(AppError::LoginRequired);
        };
        let line = CartLine::from_product(product, quantity);

        let items = self
            .guarded(backend.add_to_cart(session, &line))
            .await?;
        self.lines = items;
        self.is_open = true;
        Ok(())
    }

    /// Add a curated bundle: each product becomes a quantity-1 line,
    /// merged server-side with existing identical product ids.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::add_to_cart`].
    #[instrument(skip_all, fields(count = products.len()))]
    pub async fn add_multiple(
        &mut self,
        backend: &BackendClient,
        session: Option<&AuthSession>,
        products: &[Product],
    ) -> Result<()> {
        let Some(session) = session else {
            return Err(AppError::LoginRequired);
        };
        let items: Vec<CartLine> = products
            .iter()
            .map(|product| CartLine::from_product(product, 1))
            .collect();

        let items = self.guarded(backend.bulk_add(session, items)).await?;
        self.lines = items;
        self.is_open = true;
        Ok(())
    }

    /// Set a line's quantity. A target below 1 is a no-op: callers must
    /// use [`Self::remove`] to delete a line, never zero it out.
    ///
    /// # Errors
    ///
    /// Returns the backend error on failure; local state is untouched.
    #[instrument(skip_all, fields(product_id, new_quantity))]
    pub async fn update_quantity(
        &mut self,
        backend: &BackendClient,
        session: &AuthSession,
        product_id: &str,
        new_quantity: u32,
    ) -> Result<()> {
        if new_quantity < 1 {
            return Ok(());
        }
        let items = self
            .guarded(backend.update_quantity(session, product_id, new_quantity))
            .await?;
        self.lines = items;
        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns the backend error on failure; local state is untouched.
    #[instrument(skip_all, fields(product_id))]
    pub async fn remove(
        &mut self,
        backend: &BackendClient,
        session: &AuthSession,
        product_id: &str,
    ) -> Result<()> {
        let items = self
            .guarded(backend.remove_item(session, product_id))
            .await?;
        self.lines = items;
        Ok(())
    }

    /// Clear the cart after a confirmed order.
    ///
    /// Local state is forced empty unconditionally - the user must not
    /// see stale items after a confirmed order - and the server clear is
    /// fire-and-forget: a failure is logged, never surfaced.
    #[instrument(skip_all)]
    pub async fn clear(&mut self, backend: &BackendClient, session: Option<&AuthSession>) {
        self.reset_local();
        if let Some(session) = session
            && let Err(err) = backend.clear_cart(session).await
        {
            warn!(error = %err, "server-side cart clear failed; local cart already emptied");
        }
    }

    /// Run one backend mutation under the busy flag.
    async fn guarded<T>(
        &mut self,
        operation: impl Future<Output = std::result::Result<T, crate::backend::BackendError>>,
    ) -> Result<T> {
        if self.busy {
            return Err(AppError::Busy);
        }
        self.busy = true;
        let result = operation.await;
        self.busy = false;
        Ok(result?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product_id: &str, price: u32, quantity: u32) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            name: product_id.to_string(),
            image_url: None,
            unit: "Unit".to_string(),
            price: Decimal::from(price),
            set_price: None,
            set_quantity: None,
            quantity,
        }
    }

    fn store_with(lines: Vec<CartLine>) -> CartStore {
        CartStore {
            lines,
            is_open: false,
            busy: false,
        }
    }

    #[test]
    fn test_count_and_total_are_derived() {
        let store = store_with(vec![line("p1", 5000, 2), line("p2", 1000, 3)]);
        assert_eq!(store.count(), 5);
        assert_eq!(store.total(), Decimal::from(13000));
        // Idempotent: no state was consumed computing them.
        assert_eq!(store.total(), Decimal::from(13000));
    }

    #[test]
    fn test_total_applies_set_deal() {
        let mut deal = line("p1", 1000, 5);
        deal.set_price = Some(Decimal::from(800));
        deal.set_quantity = Some(5);
        let store = store_with(vec![deal]);
        assert_eq!(store.total(), Decimal::from(4000));
    }

    #[test]
    fn test_reset_local_empties_without_network() {
        let mut store = store_with(vec![line("p1", 5000, 2)]);
        store.is_open = true;
        store.reset_local();
        assert!(store.lines().is_empty());
        assert!(!store.is_open());
    }

    #[test]
    fn test_new_store_is_empty_and_idle() {
        let store = CartStore::new();
        assert!(store.lines().is_empty());
        assert_eq!(store.count(), 0);
        assert_eq!(store.total(), Decimal::ZERO);
        assert!(!store.is_busy());
        assert!(!store.is_open());
    }
}
