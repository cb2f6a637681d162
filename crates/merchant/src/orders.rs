//! Order fetch, enrichment, and the status workflow.
//!
//! Orders arrive from the backend with bare product references; every line
//! item needs a separate product-detail lookup before a total can be shown.
//! The lookups fan out concurrently across all line items of all orders and
//! the load completes only at their join: either every lookup succeeded and
//! the displayed list is replaced atomically, or the whole load is treated
//! as failed and whatever was displayed before stays put.
//!
//! Status changes go through the closed state machine in
//! [`storekeeper_core::OrderStatus`], then a full reload - the displayed
//! state is always server truth, never a local patch.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use storekeeper_core::{OrderId, OrderStatus, Price, ProductId, StatusError, StoreId};

use crate::api::{ApiError, BackendClient, OrderRecord};

/// Errors surfaced by the order workflow.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Transport or backend failure during fetch, enrichment, or update.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The requested transition is not allowed from the order's current
    /// status. Rejected before any network call.
    #[error(transparent)]
    Transition(#[from] StatusError),

    /// The order id is not in the currently displayed list.
    #[error("order {0} is not in the current list")]
    UnknownOrder(OrderId),

    /// The order's customer has no phone number on file. Informational;
    /// no telephony action was performed.
    #[error("no phone number on file for this customer")]
    NoPhoneNumber,

    /// The platform telephony hand-off failed.
    #[error("could not start a call: {0}")]
    Dialer(String),
}

/// Owner-selectable status transitions, as presented in the action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Accept a pending order.
    Confirm,
    /// Start preparing a confirmed order.
    MarkProcessing,
    /// Complete a processing order.
    MarkDelivered,
    /// Reject the order from any non-terminal state.
    Cancel,
}

impl OrderAction {
    /// The status this action moves the order to.
    #[must_use]
    pub const fn target_status(self) -> OrderStatus {
        match self {
            Self::Confirm => OrderStatus::Confirmed,
            Self::MarkProcessing => OrderStatus::Processing,
            Self::MarkDelivered => OrderStatus::Delivered,
            Self::Cancel => OrderStatus::Cancelled,
        }
    }
}

/// Hand-off seam to the platform's telephony launcher.
///
/// Calling the customer is a side action, not a state transition; the
/// workflow resolves the number and delegates the rest.
pub trait Dialer {
    /// Launch a call to the given number.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message if the launcher could not start.
    fn dial(&self, phone: &str) -> Result<(), String>;
}

/// A line item with its product detail resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Resolved product name.
    pub name: String,
    /// Resolved unit price.
    pub price: Price,
    /// Ordered quantity.
    pub quantity: u32,
}

impl OrderLine {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// A fully enriched order, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    /// Order identifier.
    pub id: OrderId,
    /// Current status, as of the last load.
    pub status: OrderStatus,
    /// When the customer placed the order.
    pub created_at: DateTime<Utc>,
    /// Owning store's display name.
    pub store_name: String,
    /// Purchasing user's username, when on file.
    pub customer_username: Option<String>,
    /// Purchasing user's phone number, when on file.
    pub customer_phone: Option<String>,
    /// Enriched line items.
    pub lines: Vec<OrderLine>,
    /// Σ(price × quantity) over the lines. Only ever computed once every
    /// line item's detail has resolved.
    pub total: Decimal,
}

/// Fetches, enriches, and mutates the signed-in store's orders.
#[derive(Debug)]
pub struct OrderWorkflow {
    api: BackendClient,
    store_id: StoreId,
    orders: Vec<OrderView>,
    loading: bool,
}

impl OrderWorkflow {
    /// Create a workflow scoped to one store's orders.
    #[must_use]
    pub const fn new(api: BackendClient, store_id: StoreId) -> Self {
        Self {
            api,
            store_id,
            orders: Vec::new(),
            loading: false,
        }
    }

    /// The currently displayed list (empty before the first load).
    #[must_use]
    pub fn orders(&self) -> &[OrderView] {
        &self.orders
    }

    /// Whether a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch and enrich the order list.
    ///
    /// On success the displayed list is replaced atomically with the fully
    /// enriched set. On any failure - including a single product lookup
    /// failing - the previous list is preserved unchanged and the error is
    /// returned after the loading state ends.
    ///
    /// # Errors
    ///
    /// Returns the first fetch or enrichment failure.
    #[instrument(skip(self), fields(store_id = %self.store_id))]
    pub async fn refresh(&mut self) -> Result<&[OrderView], OrderError> {
        self.loading = true;
        let result = self.load().await;
        self.loading = false;

        match result {
            Ok(views) => {
                debug!(count = views.len(), "order list replaced");
                self.orders = views;
                Ok(&self.orders)
            }
            Err(e) => {
                warn!(error = %e, "order load failed; keeping previously displayed list");
                Err(e)
            }
        }
    }

    async fn load(&self) -> Result<Vec<OrderView>, OrderError> {
        let records = self.api.orders_by_store(&self.store_id).await?;

        // One future per order, each fanning out one lookup per line item;
        // the join completes only when every lookup everywhere has.
        let views = try_join_all(records.iter().map(|record| self.enrich(record))).await?;
        Ok(views)
    }

    async fn enrich(&self, record: &OrderRecord) -> Result<OrderView, ApiError> {
        let details = try_join_all(
            record
                .products
                .iter()
                .map(|item| self.api.fetch_product(&item.product.id)),
        )
        .await?;

        let lines: Vec<OrderLine> = record
            .products
            .iter()
            .zip(details)
            .map(|(item, detail)| OrderLine {
                product_id: item.product.id.clone(),
                name: detail.name,
                price: detail.price,
                quantity: item.quantity,
            })
            .collect();

        let total = lines.iter().map(OrderLine::line_total).sum();

        Ok(OrderView {
            id: record.order_id.clone(),
            status: record.status,
            created_at: record.created_at,
            store_name: record.store.name.clone(),
            customer_username: record.customer.username.clone(),
            customer_phone: record.customer.phone.clone(),
            lines,
            total,
        })
    }

    /// Apply a status transition to one order.
    ///
    /// The transition is validated against the state machine before any
    /// network call. After the backend accepts the update, the whole list
    /// is reloaded - strictly sequentially - so the displayed status and
    /// totals reflect server truth.
    ///
    /// # Errors
    ///
    /// `UnknownOrder` if the id is not in the displayed list,
    /// `Transition` if the state machine rejects the move, and any fetch
    /// or reload failure otherwise.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn apply(
        &mut self,
        order_id: &OrderId,
        action: OrderAction,
    ) -> Result<&[OrderView], OrderError> {
        let current = self
            .orders
            .iter()
            .find(|order| &order.id == order_id)
            .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))?
            .status;

        let target = current.transition_to(action.target_status())?;

        self.api.update_order_status(order_id, target).await?;

        // Reload only after the update's response is observed
        self.refresh().await
    }

    /// Call the customer behind an order.
    ///
    /// # Errors
    ///
    /// `UnknownOrder` if the id is not in the displayed list,
    /// `NoPhoneNumber` (informational) when nothing is on file, `Dialer`
    /// if the platform hand-off fails.
    pub fn call_customer(&self, order_id: &OrderId, dialer: &dyn Dialer) -> Result<(), OrderError> {
        let order = self
            .orders
            .iter()
            .find(|order| &order.id == order_id)
            .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))?;

        let phone = order
            .customer_phone
            .as_deref()
            .ok_or(OrderError::NoPhoneNumber)?;

        dialer.dial(phone).map_err(OrderError::Dialer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Server, ServerGuard};
    use std::sync::Mutex;

    struct RecordingDialer {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingDialer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }
    }

    impl Dialer for RecordingDialer {
        fn dial(&self, phone: &str) -> Result<(), String> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(phone.to_string());
            Ok(())
        }
    }

    fn orders_body(status: &str, phone: Option<&str>) -> String {
        serde_json::json!([{
            "orderId": "0000017",
            "status": status,
            "createdAt": "2026-07-01T10:15:00Z",
            "storeId": {"_id": "s1", "name": "Cake By Dee"},
            "userId": {"_id": "u1", "username": "ali", "phone": phone},
            "products": [
                {"productId": {"_id": "p1"}, "quantity": 2},
                {"productId": {"_id": "p2"}, "quantity": 1}
            ]
        }])
        .to_string()
    }

    async fn mock_products(server: &mut ServerGuard) {
        server
            .mock("GET", "/products/p1")
            .with_status(200)
            .with_body(r#"{"_id": "p1", "name": "Chocolate Cake", "price": "100"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/products/p2")
            .with_status(200)
            .with_body(r#"{"_id": "p2", "name": "Cupcake Box", "price": "50"}"#)
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn refresh_enriches_lines_and_totals() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(orders_body("pending", Some("+92300")))
            .create_async()
            .await;
        mock_products(&mut server).await;

        let mut workflow = OrderWorkflow::new(BackendClient::new(&server.url()), StoreId::new("s1"));
        let orders = workflow.refresh().await.expect("refresh");

        let order = orders.first().expect("one order");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.store_name, "Cake By Dee");
        assert_eq!(order.lines.len(), 2);
        // 2 × 100 + 1 × 50
        assert_eq!(order.total, Decimal::from(250));
        assert!(!workflow.is_loading());
    }

    #[tokio::test]
    async fn failed_product_lookup_preserves_previous_list() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(orders_body("pending", None))
            .create_async()
            .await;
        mock_products(&mut server).await;

        let mut workflow = OrderWorkflow::new(BackendClient::new(&server.url()), StoreId::new("s1"));
        workflow.refresh().await.expect("first refresh");
        assert_eq!(workflow.orders().len(), 1);

        // Newer mocks win: the next load sees an order whose product
        // detail lookup blows up.
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(
                serde_json::json!([{
                    "orderId": "0000018",
                    "status": "pending",
                    "createdAt": "2026-07-02T09:00:00Z",
                    "storeId": {"_id": "s1", "name": "Cake By Dee"},
                    "userId": {"_id": "u2"},
                    "products": [{"productId": {"_id": "p404"}, "quantity": 1}]
                }])
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/products/p404")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = workflow.refresh().await.expect_err("enrichment must fail");
        assert!(matches!(err, OrderError::Api(_)));

        // The previously displayed order is untouched
        assert_eq!(workflow.orders().len(), 1);
        assert_eq!(
            workflow.orders().first().expect("previous order").id,
            OrderId::new("0000017")
        );
        assert!(!workflow.is_loading());
    }

    #[tokio::test]
    async fn invalid_transition_is_rejected_before_any_network_call() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(orders_body("delivered", None))
            .create_async()
            .await;
        mock_products(&mut server).await;

        let mut workflow = OrderWorkflow::new(BackendClient::new(&server.url()), StoreId::new("s1"));
        workflow.refresh().await.expect("refresh");

        // No PUT mock exists; reaching the network would fail differently
        let err = workflow
            .apply(&OrderId::new("0000017"), OrderAction::Confirm)
            .await
            .expect_err("terminal order");
        assert!(matches!(
            err,
            OrderError::Transition(StatusError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn apply_updates_then_reloads_server_truth() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(orders_body("pending", None))
            .create_async()
            .await;
        mock_products(&mut server).await;

        let mut workflow = OrderWorkflow::new(BackendClient::new(&server.url()), StoreId::new("s1"));
        workflow.refresh().await.expect("refresh");

        let put = server
            .mock("PUT", "/orders/0000017/status")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"status": "confirmed"}),
            ))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "orderId": "0000017",
                    "status": "confirmed",
                    "createdAt": "2026-07-01T10:15:00Z",
                    "storeId": {"_id": "s1", "name": "Cake By Dee"},
                    "userId": {"_id": "u1"},
                    "products": []
                })
                .to_string(),
            )
            .create_async()
            .await;
        // The reload after the update sees the new server state
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(orders_body("confirmed", None))
            .create_async()
            .await;

        let orders = workflow
            .apply(&OrderId::new("0000017"), OrderAction::Confirm)
            .await
            .expect("apply");

        assert_eq!(
            orders.first().expect("order").status,
            OrderStatus::Confirmed
        );
        put.assert_async().await;
    }

    #[tokio::test]
    async fn call_customer_resolves_phone_or_reports_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(orders_body("pending", Some("+92300")))
            .create_async()
            .await;
        mock_products(&mut server).await;

        let mut workflow = OrderWorkflow::new(BackendClient::new(&server.url()), StoreId::new("s1"));
        workflow.refresh().await.expect("refresh");

        let dialer = RecordingDialer::new();
        workflow
            .call_customer(&OrderId::new("0000017"), &dialer)
            .expect("dial");
        assert_eq!(dialer.calls(), vec!["+92300".to_string()]);

        // Same order, but no phone on file this time
        server
            .mock("GET", "/stores/s1/orders")
            .with_status(200)
            .with_body(orders_body("pending", None))
            .create_async()
            .await;
        workflow.refresh().await.expect("refresh");

        let err = workflow
            .call_customer(&OrderId::new("0000017"), &dialer)
            .expect_err("no phone");
        assert!(matches!(err, OrderError::NoPhoneNumber));
        // No second dial happened
        assert_eq!(dialer.calls().len(), 1);
    }
}
