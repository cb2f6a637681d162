//! Product catalog management.
//!
//! Drafts coming off the product form are validated field by field before
//! anything touches the network; violations come back tagged with the
//! offending field so the shell can render them inline.

use thiserror::Error;
use tracing::instrument;

use storekeeper_core::{Price, ProductId, StoreId};

use crate::api::{ApiError, BackendClient, ProductPayload, ProductRecord};

/// Form fields a draft can fail validation on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Price,
}

/// One inline validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Which field is at fault.
    pub field: DraftField,
    /// Message to render next to it.
    pub message: String,
}

impl FieldError {
    fn new(field: DraftField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// One or more draft fields failed validation; nothing was sent.
    #[error("product draft has invalid fields")]
    Invalid(Vec<FieldError>),

    /// The backend reported the delete did not happen.
    #[error("backend refused to delete the product")]
    DeleteRefused,

    /// Transport or backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw form state for creating or editing a product.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    /// Price exactly as typed; coerced during validation.
    pub price: String,
    pub category: String,
    /// Image reference - hosted URL or local fallback - if one was picked.
    pub image: Option<String>,
}

impl ProductDraft {
    /// Validate the draft into a sendable payload.
    ///
    /// # Errors
    ///
    /// Returns every per-field violation at once: name required; price
    /// required, numeric, and positive.
    pub fn validate(&self) -> Result<ProductPayload, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new(DraftField::Name, "Product name is required"));
        }

        let price = if self.price.trim().is_empty() {
            errors.push(FieldError::new(DraftField::Price, "Price is required"));
            None
        } else {
            match Price::parse(&self.price) {
                Ok(price) if price.amount() > rust_decimal::Decimal::ZERO => Some(price),
                _ => {
                    errors.push(FieldError::new(
                        DraftField::Price,
                        "Please enter a valid price",
                    ));
                    None
                }
            }
        };

        // errors is empty exactly when the name is present and the price
        // parsed
        match price {
            Some(price) if errors.is_empty() => Ok(ProductPayload {
                name: name.to_string(),
                description: non_empty(&self.description),
                price,
                category: non_empty(&self.category),
                image: self.image.clone(),
            }),
            _ => Err(errors),
        }
    }
}

fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Catalog operations for the signed-in store.
#[derive(Debug, Clone)]
pub struct CatalogService {
    api: BackendClient,
}

impl CatalogService {
    /// Create a catalog service over the backend client.
    #[must_use]
    pub const fn new(api: BackendClient) -> Self {
        Self { api }
    }

    /// List the store's products.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    pub async fn list(&self, store_id: &StoreId) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self.api.products_by_store(store_id).await?)
    }

    /// Validate a draft and create the product.
    ///
    /// # Errors
    ///
    /// `Invalid` before any network call when the draft fails validation;
    /// the backend's errors otherwise.
    #[instrument(skip(self, draft), fields(store_id = %store_id))]
    pub async fn create(
        &self,
        store_id: &StoreId,
        draft: &ProductDraft,
    ) -> Result<ProductRecord, CatalogError> {
        let payload = draft.validate().map_err(CatalogError::Invalid)?;
        Ok(self.api.add_product(store_id, &payload).await?)
    }

    /// Validate a draft and update an existing product.
    ///
    /// # Errors
    ///
    /// `Invalid` before any network call when the draft fails validation;
    /// the backend's errors otherwise.
    #[instrument(skip(self, draft), fields(product_id = %product_id))]
    pub async fn update(
        &self,
        product_id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<ProductRecord, CatalogError> {
        let payload = draft.validate().map_err(CatalogError::Invalid)?;
        Ok(self.api.update_product(product_id, &payload).await?)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// `DeleteRefused` when the backend answers `false`; the backend's
    /// errors otherwise.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete(&self, product_id: &ProductId) -> Result<(), CatalogError> {
        if self.api.delete_product(product_id).await? {
            Ok(())
        } else {
            Err(CatalogError::DeleteRefused)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn draft(name: &str, price: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: price.to_string(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_valid_draft_becomes_payload() {
        let mut full = draft("Chocolate Cake", "99.99");
        full.description = "  Rich and dark  ".to_string();
        full.category = String::new();

        let payload = full.validate().expect("valid");
        assert_eq!(payload.name, "Chocolate Cake");
        assert_eq!(payload.description.as_deref(), Some("Rich and dark"));
        assert_eq!(payload.category, None);
        assert_eq!(payload.price.to_string(), "99.99");
    }

    #[test]
    fn test_empty_name_and_price_report_both_fields() {
        let errors = draft("   ", "").validate().expect_err("invalid");
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == DraftField::Name));
        assert!(
            errors
                .iter()
                .any(|e| e.field == DraftField::Price && e.message == "Price is required")
        );
    }

    #[test]
    fn test_non_numeric_price_is_invalid() {
        let errors = draft("Cake", "free").validate().expect_err("invalid");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.first().expect("one error").message,
            "Please enter a valid price"
        );
    }

    #[test]
    fn test_zero_and_negative_prices_are_invalid() {
        assert!(draft("Cake", "0").validate().is_err());
        assert!(draft("Cake", "-10").validate().is_err());
    }

    #[tokio::test]
    async fn create_with_invalid_draft_never_touches_the_network() {
        // Unroutable URL: a network call would fail as Api, not Invalid
        let service = CatalogService::new(BackendClient::new("http://127.0.0.1:9"));

        let err = service
            .create(&StoreId::new("s1"), &draft("", "abc"))
            .await
            .expect_err("invalid");
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[tokio::test]
    async fn delete_false_is_refused() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/products/p1")
            .with_status(200)
            .with_body("false")
            .create_async()
            .await;

        let service = CatalogService::new(BackendClient::new(&server.url()));
        let err = service
            .delete(&ProductId::new("p1"))
            .await
            .expect_err("refused");
        assert!(matches!(err, CatalogError::DeleteRefused));
    }

    #[tokio::test]
    async fn delete_true_succeeds() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/products/p1")
            .with_status(200)
            .with_body("true")
            .create_async()
            .await;

        let service = CatalogService::new(BackendClient::new(&server.url()));
        service.delete(&ProductId::new("p1")).await.expect("deleted");
    }
}
