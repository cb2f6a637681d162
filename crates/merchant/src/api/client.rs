//! Backend HTTP client implementation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use storekeeper_core::{GeoPoint, OrderId, OrderStatus, ProductId, StoreId, Username};

use super::ApiError;
use super::types::{
    CheckUsernameRequest, CheckUsernameResponse, OrderRecord, ProductPayload, ProductRecord,
    StorePatch, StoreRecord, UpdateOrderStatusRequest, VerifyPasswordRequest,
    VerifyPasswordResponse,
};

/// How long product-detail reads stay cached.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the store/product/order backend.
///
/// Cheap to clone; all clones share one connection pool and one
/// product-detail cache. Orders and stores are always fetched fresh -
/// only product details (effectively static between catalog edits) are
/// cached.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    base_url: String,
    product_cache: Cache<ProductId, ProductRecord>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new backend client for the given base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                product_cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Authentication handshake
    // =========================================================================

    /// Ask the backend whether a username exists.
    ///
    /// A failed lookup still produces a parseable `{success: false, error}`
    /// body, so this call tolerates non-success statuses as long as the
    /// body has the expected shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is unreadable.
    #[instrument(skip(self), fields(username = %username))]
    pub async fn check_username(
        &self,
        username: &Username,
    ) -> Result<CheckUsernameResponse, ApiError> {
        let request = CheckUsernameRequest {
            username: username.as_str(),
        };

        let response = self
            .inner
            .client
            .post(self.url("/stores/check-username"))
            .json(&request)
            .send()
            .await?;

        read_json_lenient(response).await
    }

    /// Verify a username/password pair.
    ///
    /// Like [`Self::check_username`], a mismatch answer is a parseable body
    /// regardless of status code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is unreadable.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn verify_password(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<VerifyPasswordResponse, ApiError> {
        let request = VerifyPasswordRequest {
            username: username.as_str(),
            password,
        };

        let response = self
            .inner
            .client
            .post(self.url("/stores/verify-password"))
            .json(&request)
            .send()
            .await?;

        read_json_lenient(response).await
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Fetch a store record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn fetch_store(&self, store_id: &StoreId) -> Result<StoreRecord, ApiError> {
        self.get(&format!("/stores/{store_id}")).await
    }

    /// Update a store with a changed-fields-only patch.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, patch), fields(store_id = %store_id))]
    pub async fn update_store(
        &self,
        store_id: &StoreId,
        patch: &StorePatch,
    ) -> Result<StoreRecord, ApiError> {
        self.send(Method::PUT, &format!("/stores/{store_id}"), patch)
            .await
    }

    /// Save a store's geolocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn save_store_location(
        &self,
        store_id: &StoreId,
        location: GeoPoint,
    ) -> Result<StoreRecord, ApiError> {
        self.send(
            Method::PUT,
            &format!("/stores/{store_id}/location"),
            &location,
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List the products belonging to a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn products_by_store(
        &self,
        store_id: &StoreId,
    ) -> Result<Vec<ProductRecord>, ApiError> {
        self.get(&format!("/stores/{store_id}/products")).await
    }

    /// Fetch one product by id, through the short-TTL cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn fetch_product(&self, product_id: &ProductId) -> Result<ProductRecord, ApiError> {
        if let Some(hit) = self.inner.product_cache.get(product_id).await {
            debug!("product cache hit");
            return Ok(hit);
        }

        let record: ProductRecord = self.get(&format!("/products/{product_id}")).await?;
        self.inner
            .product_cache
            .insert(product_id.clone(), record.clone())
            .await;
        Ok(record)
    }

    /// Create a product under a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, payload), fields(store_id = %store_id, name = %payload.name))]
    pub async fn add_product(
        &self,
        store_id: &StoreId,
        payload: &ProductPayload,
    ) -> Result<ProductRecord, ApiError> {
        self.send(
            Method::POST,
            &format!("/stores/{store_id}/products"),
            payload,
        )
        .await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, payload), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<ProductRecord, ApiError> {
        let record: ProductRecord = self
            .send(Method::PUT, &format!("/products/{product_id}"), payload)
            .await?;
        // The cached copy is stale the moment the backend accepts the edit
        self.inner.product_cache.invalidate(product_id).await;
        Ok(record)
    }

    /// Delete a product. Returns the backend's boolean success flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: &ProductId) -> Result<bool, ApiError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/products/{product_id}")))
            .send()
            .await?;

        let deleted: bool = read_json(response).await?;
        self.inner.product_cache.invalidate(product_id).await;
        Ok(deleted)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List a store's orders, line items unresolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend answers with a
    /// non-success status.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn orders_by_store(&self, store_id: &StoreId) -> Result<Vec<OrderRecord>, ApiError> {
        self.get(&format!("/stores/{store_id}/orders")).await
    }

    /// Move an order to a new status.
    ///
    /// The caller is expected to reload the order list afterwards; the
    /// record returned here is informational.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderRecord, ApiError> {
        let request = UpdateOrderStatusRequest { status };
        self.send(Method::PUT, &format!("/orders/{order_id}/status"), &request)
            .await
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        read_json(response).await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Read a response body, treating any non-success status as an error.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!(
            status = %status,
            body = %truncate(&text),
            "backend returned non-success status"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: truncate(&text),
        });
    }

    serde_json::from_str(&text).map_err(ApiError::Parse)
}

/// Read a response body, preferring a parseable body over the status code.
///
/// The authentication endpoints answer failed lookups with a body like
/// `{success: false, error}` under a 4xx status; that body is the answer,
/// not a transport failure.
async fn read_json_lenient<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str(&text) {
        Ok(parsed) => Ok(parsed),
        Err(_) if !status.is_success() => Err(ApiError::Status {
            status: status.as_u16(),
            body: truncate(&text),
        }),
        Err(e) => Err(ApiError::Parse(e)),
    }
}

/// Keep logged bodies bounded.
fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
