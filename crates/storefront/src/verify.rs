//! Payment verification handshake.
//!
//! Runs on return from the hosted gateway redirect and converts the
//! persisted [`PendingOrderIntent`] into a finalized order exactly once.
//! The redirect-return page is routinely re-entered (back button, double
//! navigation, prefetch), so the handshake is guarded by a one-shot
//! latch: only the first invocation proceeds past it, and a naive
//! re-submission against an already-charged transaction can never create
//! a duplicate order.
//!
//! State machine: `verifying -> {success, failed}`, both terminal.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{error, instrument};

use regenessa_core::PendingOrderIntent;

use crate::backend::BackendClient;
use crate::backend::types::FinalizeOrderRequest;
use crate::cart::CartStore;
use crate::models::AuthSession;
use crate::storage::{ClientStore, keys};

/// Route to send the user to after a successful verification.
pub const ORDER_HISTORY_ROUTE: &str = "/orders";

/// How long the success panel shows before navigating to order history.
pub const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Query parameter names a gateway may use for the transaction id.
/// Either one is sufficient to attempt verification.
const TRANSACTION_PARAMS: [&str; 2] = ["transaction_id", "tx_ref"];

/// Current state of the handshake, as shown by the verification page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStatus {
    /// Verification in progress.
    Verifying,
    /// Order finalized; terminal.
    Success,
    /// Verification failed. Terminal once the handshake has actually
    /// run; a rejection raised before the latch is taken (no
    /// transaction id in the query) does not consume the handshake, so
    /// a later return carrying a real id may still verify and move the
    /// status to `Success`. Otherwise recovery is a fresh checkout.
    Failed,
}

/// Result of one invocation of the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The order was finalized. The UI should clear down and, after
    /// [`SUCCESS_REDIRECT_DELAY`], navigate to [`ORDER_HISTORY_ROUTE`].
    Success {
        /// Server-assigned order id, when the backend returns one.
        order_id: Option<String>,
    },
    /// Verification failed; `message` is user-visible. The pending
    /// intent, if any, remains available for a fresh checkout attempt.
    Failed { message: String },
    /// Another invocation already ran (or is running); this one did
    /// nothing. The page should keep showing the existing status.
    AlreadyHandled,
}

/// One-shot verification handshake for a single redirect return.
///
/// Construct one per verification page visit; the latch inside survives
/// re-invocation of the handler but not a full page reload - which is
/// safe, because a reload after success finds no intent and fails
/// closed, and a reload after failure finds the restored intent intact.
pub struct PaymentVerifier {
    started: AtomicBool,
    status: Mutex<VerifyStatus>,
}

impl Default for PaymentVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentVerifier {
    /// Create a fresh verifier in the `Verifying` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            started: AtomicBool::new(false),
            status: Mutex::new(VerifyStatus::Verifying),
        }
    }

    /// Current handshake status.
    #[must_use]
    pub fn status(&self) -> VerifyStatus {
        *self
            .status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, status: VerifyStatus) {
        *self
            .status
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Extract the transaction identifier from a redirect-return query
    /// string, accepting either supported parameter name.
    #[must_use]
    pub fn transaction_id_from_query(query: &str) -> Option<String> {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(name, value)| {
                TRANSACTION_PARAMS.contains(&name.as_ref()) && !value.is_empty()
            })
            .map(|(_, value)| value.into_owned())
    }

    /// Run the handshake for a redirect return carrying `query`.
    ///
    /// Exactly one invocation per verifier reaches the order-creation
    /// endpoint; later invocations return
    /// [`VerifyOutcome::AlreadyHandled`] without side effects.
    #[instrument(skip_all)]
    pub async fn verify(
        &self,
        backend: &BackendClient,
        session: &AuthSession,
        cart: &mut CartStore,
        store: &ClientStore,
        query: &str,
    ) -> VerifyOutcome {
        let Some(transaction_id) = Self::transaction_id_from_query(query) else {
            return self.fail("We could not confirm the transaction. If you were debited, please contact support.");
        };

        // One-shot latch: re-entry (back button, double navigation)
        // must never re-submit the order.
        if self.started.swap(true, Ordering::SeqCst) {
            return VerifyOutcome::AlreadyHandled;
        }

        // Consume-once load: a second reader can never also see the
        // intent. Restored below if finalization fails.
        let intent: PendingOrderIntent = match store.take(keys::PENDING_ORDER) {
            Ok(Some(intent)) => intent,
            Ok(None) => {
                // No intent is ambiguous: either a prior invocation
                // already finalized, or the intent was never stored.
                // Fail closed rather than claim an unconfirmed success.
                return self.fail(
                    "No pending order was found for this payment. Please check your order history before retrying.",
                );
            }
            Err(err) => {
                error!(error = %err, "failed to load pending order intent");
                return self.fail("We could not confirm the transaction. If you were debited, please contact support.");
            }
        };

        let request = FinalizeOrderRequest {
            items: intent.items.clone(),
            total_amount: intent.total_amount,
            shipping_details: intent.shipping_details.clone(),
            transaction_id,
        };

        match backend.finalize_order(session, &request).await {
            Ok(response) => {
                cart.clear(backend, Some(session)).await;
                self.set_status(VerifyStatus::Success);
                VerifyOutcome::Success {
                    order_id: response.order_id,
                }
            }
            Err(err) => {
                // Keep the intent available for a manual retry from the
                // checkout page (which will mint a fresh tx_ref).
                if let Err(put_err) = store.put(keys::PENDING_ORDER, &intent) {
                    error!(error = %put_err, "failed to restore pending order intent");
                }
                let message = err
                    .server_message()
                    .map_or_else(|| "Order submission failed".to_string(), String::from);
                self.fail(&message)
            }
        }
    }

    fn fail(&self, message: &str) -> VerifyOutcome {
        self.set_status(VerifyStatus::Failed);
        VerifyOutcome::Failed {
            message: message.to_string(),
        }
    }
}
