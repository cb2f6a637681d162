//! Wire types for the backend REST API.
//!
//! The backend speaks Mongo-flavored camelCase JSON: records carry an `_id`
//! hex string, references inside orders are populated documents, and prices
//! travel as strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeeper_core::{CustomerId, OrderId, OrderStatus, Price, ProductId, StoreId};

// =============================================================================
// Stores
// =============================================================================

/// A store record as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    /// Backend identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: StoreId,
    /// Store display name.
    pub name: String,
    /// Owner display name.
    pub owner: String,
    /// Login username.
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the store is visible to customers.
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lng: Option<String>,
}

const fn default_active() -> bool {
    true
}

/// Store display names resolved by the username-existence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreIdentity {
    /// Store display name.
    pub name: String,
    /// Owner display name.
    pub owner: String,
}

/// Changed-fields-only store update payload.
///
/// Fields left `None` are omitted from the JSON entirely, so the backend
/// only sees what actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_lng: Option<String>,
}

impl StorePatch {
    /// Whether the patch carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.owner.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.location_lat.is_none()
            && self.location_lng.is_none()
    }
}

// =============================================================================
// Authentication handshake
// =============================================================================

/// Request body for `POST /stores/check-username`.
#[derive(Debug, Serialize)]
pub struct CheckUsernameRequest<'a> {
    pub username: &'a str,
}

/// Response of the username-existence check.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckUsernameResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub store: Option<StoreIdentity>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `POST /stores/verify-password`.
#[derive(Debug, Serialize)]
pub struct VerifyPasswordRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of the password verification call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPasswordResponse {
    #[serde(default)]
    pub password_matches: bool,
    #[serde(default)]
    pub store: Option<StoreRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// A product record as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Backend identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// String-serialized decimal on the wire.
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
}

/// Product fields sent when creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order as the backend returns it, line items not yet enriched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Populated store reference.
    #[serde(rename = "storeId")]
    pub store: OrderStoreRef,
    /// Populated purchasing-user reference.
    #[serde(rename = "userId")]
    pub customer: OrderCustomerRef,
    /// Line items, each a bare product reference plus quantity.
    pub products: Vec<LineItemRecord>,
}

/// The owning store, as populated inside an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStoreRef {
    #[serde(rename = "_id")]
    pub id: StoreId,
    pub name: String,
}

/// The purchasing user, as populated inside an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCustomerRef {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// One product-and-quantity entry within an order.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRecord {
    /// Populated product reference; details are fetched separately.
    #[serde(rename = "productId")]
    pub product: ProductRef,
    pub quantity: u32,
}

/// Bare product reference inside a line item.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRef {
    #[serde(rename = "_id")]
    pub id: ProductId,
}

/// Request body for the order status update call.
#[derive(Debug, Serialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
