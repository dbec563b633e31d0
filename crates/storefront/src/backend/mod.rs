//! Backend API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; the backend is the source of truth for
//!   the cart - every mutation returns the full authoritative item list
//!   and the caller replaces local state with it.
//! - Catalog reads are cached in-memory via `moka` (5-minute TTL). Cart
//!   and order reads are never cached.
//! - Authenticated calls attach the session's bearer token per request.
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | GET | `/cart` | fetch current user's cart |
//! | POST | `/cart/add` | add/increment one line |
//! | POST | `/cart/bulk-add` | add multiple lines |
//! | PUT | `/cart/item/:productId` | set quantity |
//! | DELETE | `/cart/item/:productId` | remove line |
//! | DELETE | `/cart/clear` | empty cart |
//! | POST | `/upload/payment-proof` | multipart receipt upload |
//! | POST | `/orders/checkout` | manual-path order creation |
//! | POST | `/payment/initialize` | gateway-path payment init |
//! | POST | `/orders` | gateway-path order finalization |
//! | GET | `/orders/my-orders` | order history |
//! | GET | `/products` | catalog listing (cached) |
//! | GET | `/products/:id` | one catalog item (cached) |

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{debug, instrument};

use regenessa_core::{CartLine, Order, Product};

use crate::config::StorefrontConfig;
use crate::models::AuthSession;
use types::{
    BulkAddRequest, CartItemsResponse, CheckoutRequest, CheckoutResponse, ErrorBody,
    FinalizeOrderRequest, FinalizeOrderResponse, PaymentInitRequest, PaymentInitResponse,
    QuantityUpdate, UploadResponse,
};

/// Catalog cache TTL.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (network, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl BackendError {
    /// The server-provided error message, if the backend sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// A payment receipt file to upload.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    /// Original file name, e.g. "transfer.png".
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// Client for the Regenessa backend API.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.backend_url.clone(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Build a request with the session's bearer token attached.
    fn authed(&self, method: Method, path: &str, session: &AuthSession) -> RequestBuilder {
        self.inner
            .client
            .request(method, self.url(path))
            .bearer_auth(session.token().expose_secret())
    }

    /// Send a request and map non-success responses to `BackendError::Api`,
    /// extracting the backend's `{"error": "..."}` message when present.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or_else(|_| String::new(), |b| b.error);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the current user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn get_cart(&self, session: &AuthSession) -> Result<Vec<CartLine>, BackendError> {
        let response = self.send(self.authed(Method::GET, "/cart", session)).await?;
        let body: CartItemsResponse = response.json().await?;
        Ok(body.items)
    }

    /// Add or increment one line; the backend merges by product id.
    ///
    /// Returns the full updated item list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session, line), fields(product_id = %line.product_id))]
    pub async fn add_to_cart(
        &self,
        session: &AuthSession,
        line: &CartLine,
    ) -> Result<Vec<CartLine>, BackendError> {
        let response = self
            .send(self.authed(Method::POST, "/cart/add", session).json(line))
            .await?;
        let body: CartItemsResponse = response.json().await?;
        Ok(body.items)
    }

    /// Add multiple lines in one request (curated bundle).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session, items), fields(count = items.len()))]
    pub async fn bulk_add(
        &self,
        session: &AuthSession,
        items: Vec<CartLine>,
    ) -> Result<Vec<CartLine>, BackendError> {
        let request = BulkAddRequest { items };
        let response = self
            .send(
                self.authed(Method::POST, "/cart/bulk-add", session)
                    .json(&request),
            )
            .await?;
        let body: CartItemsResponse = response.json().await?;
        Ok(body.items)
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn update_quantity(
        &self,
        session: &AuthSession,
        product_id: &str,
        quantity: u32,
    ) -> Result<Vec<CartLine>, BackendError> {
        let response = self
            .send(
                self.authed(Method::PUT, &format!("/cart/item/{product_id}"), session)
                    .json(&QuantityUpdate { quantity }),
            )
            .await?;
        let body: CartItemsResponse = response.json().await?;
        Ok(body.items)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn remove_item(
        &self,
        session: &AuthSession,
        product_id: &str,
    ) -> Result<Vec<CartLine>, BackendError> {
        let response = self
            .send(self.authed(Method::DELETE, &format!("/cart/item/{product_id}"), session))
            .await?;
        let body: CartItemsResponse = response.json().await?;
        Ok(body.items)
    }

    /// Empty the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn clear_cart(&self, session: &AuthSession) -> Result<(), BackendError> {
        self.send(self.authed(Method::DELETE, "/cart/clear", session))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Checkout & payment
    // =========================================================================

    /// Upload a payment receipt; returns its durable URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails or the backend rejects it.
    #[instrument(skip(self, session, receipt), fields(file_name = %receipt.file_name))]
    pub async fn upload_payment_proof(
        &self,
        session: &AuthSession,
        receipt: &ReceiptUpload,
    ) -> Result<String, BackendError> {
        let part = reqwest::multipart::Part::bytes(receipt.bytes.clone())
            .file_name(receipt.file_name.clone());
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .send(
                self.authed(Method::POST, "/upload/payment-proof", session)
                    .multipart(form),
            )
            .await?;
        let body: UploadResponse = response.json().await?;
        Ok(body.image_url)
    }

    /// Create an order on the manual bank-transfer path.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session, request))]
    pub async fn checkout_order(
        &self,
        session: &AuthSession,
        request: &CheckoutRequest,
    ) -> Result<CheckoutResponse, BackendError> {
        let response = self
            .send(
                self.authed(Method::POST, "/orders/checkout", session)
                    .json(request),
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Request a hosted-payment link and transaction reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session, request))]
    pub async fn initialize_payment(
        &self,
        session: &AuthSession,
        request: &PaymentInitRequest,
    ) -> Result<PaymentInitResponse, BackendError> {
        let response = self
            .send(
                self.authed(Method::POST, "/payment/initialize", session)
                    .json(request),
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Finalize a gateway-path order against a transaction reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session, request), fields(transaction_id = %request.transaction_id))]
    pub async fn finalize_order(
        &self,
        session: &AuthSession,
        request: &FinalizeOrderRequest,
    ) -> Result<FinalizeOrderResponse, BackendError> {
        let response = self
            .send(self.authed(Method::POST, "/orders", session).json(request))
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch the current user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session))]
    pub async fn my_orders(&self, session: &AuthSession) -> Result<Vec<Order>, BackendError> {
        let response = self
            .send(self.authed(Method::GET, "/orders/my-orders", session))
            .await?;
        Ok(response.json().await?)
    }

    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    /// Fetch the product catalog, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Arc<Vec<Product>>, BackendError> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product catalog");
            return Ok(products);
        }

        let response = self
            .send(self.inner.client.get(self.url("/products")))
            .await?;
        let products: Arc<Vec<Product>> = Arc::new(response.json().await?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Fetch one product by id, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: &str) -> Result<Product, BackendError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let response = self
            .send(self.inner.client.get(self.url(&format!("/products/{product_id}"))))
            .await?;
        let product: Product = response.json().await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
