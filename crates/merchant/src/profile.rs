//! Store profile editing.
//!
//! The edit form is initialized from the loaded record; saving diffs the
//! form against that record and sends only the fields that changed. Location
//! saves go through their own endpoint with range-checked coordinates.

use thiserror::Error;
use tracing::{debug, instrument};

use storekeeper_core::{Email, EmailError, GeoPoint, LocationError, StoreId};

use crate::api::{ApiError, BackendClient, StorePatch, StoreRecord};

/// Errors surfaced by profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The store name field was cleared; a store must keep a name.
    #[error("store name is required")]
    EmptyName,

    /// The email field is structurally invalid. Inline field error; nothing
    /// was sent.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    /// The coordinates are malformed or out of range.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Transport or backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Editable form state for the store profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub owner: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub category: String,
    pub image: String,
    pub location_lat: String,
    pub location_lng: String,
}

impl ProfileForm {
    /// Initialize the form from a loaded store record.
    #[must_use]
    pub fn from_record(record: &StoreRecord) -> Self {
        Self {
            name: record.name.clone(),
            owner: record.owner.clone(),
            address: record.address.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
            email: record.email.clone().unwrap_or_default(),
            category: record.category.clone().unwrap_or_default(),
            image: record.image.clone().unwrap_or_default(),
            location_lat: record.location_lat.clone().unwrap_or_default(),
            location_lng: record.location_lng.clone().unwrap_or_default(),
        }
    }

    /// Compute the changed-fields-only patch against the loaded record.
    ///
    /// # Errors
    ///
    /// `EmptyName` if the name was cleared, `InvalidEmail` if a non-empty
    /// email fails validation. Both are raised before any network call.
    pub fn diff(&self, original: &StoreRecord) -> Result<StorePatch, ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }

        let email = self.email.trim();
        if !email.is_empty() {
            Email::parse(email)?;
        }

        Ok(StorePatch {
            name: changed(&self.name, Some(&original.name)),
            owner: changed(&self.owner, Some(&original.owner)),
            address: changed(&self.address, original.address.as_deref()),
            phone: changed(&self.phone, original.phone.as_deref()),
            email: changed(&self.email, original.email.as_deref()),
            category: changed(&self.category, original.category.as_deref()),
            image: changed(&self.image, original.image.as_deref()),
            location_lat: changed(&self.location_lat, original.location_lat.as_deref()),
            location_lng: changed(&self.location_lng, original.location_lng.as_deref()),
        })
    }
}

/// `Some(new value)` when the trimmed form field differs from the record.
fn changed(form_value: &str, original: Option<&str>) -> Option<String> {
    let trimmed = form_value.trim();
    if trimmed == original.unwrap_or_default() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Store profile operations.
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    api: BackendClient,
}

impl ProfileEditor {
    /// Create a profile editor over the backend client.
    #[must_use]
    pub const fn new(api: BackendClient) -> Self {
        Self { api }
    }

    /// Load the store record the form is edited against.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    pub async fn load(&self, store_id: &StoreId) -> Result<StoreRecord, ProfileError> {
        Ok(self.api.fetch_store(store_id).await?)
    }

    /// Validate and save the form.
    ///
    /// Returns `None` without touching the network when nothing changed,
    /// otherwise the updated record the backend returned.
    ///
    /// # Errors
    ///
    /// Validation errors before any network call; the backend's errors
    /// otherwise.
    #[instrument(skip(self, original, form), fields(store_id = %store_id))]
    pub async fn save(
        &self,
        store_id: &StoreId,
        original: &StoreRecord,
        form: &ProfileForm,
    ) -> Result<Option<StoreRecord>, ProfileError> {
        let patch = form.diff(original)?;

        if patch.is_empty() {
            debug!("no profile fields changed; skipping save");
            return Ok(None);
        }

        let updated = self.api.update_store(store_id, &patch).await?;
        Ok(Some(updated))
    }

    /// Save the store's geolocation.
    ///
    /// # Errors
    ///
    /// `Location` if the coordinates are malformed or out of range; the
    /// backend's errors otherwise.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn save_location(
        &self,
        store_id: &StoreId,
        lat: &str,
        lng: &str,
    ) -> Result<StoreRecord, ProfileError> {
        let point = GeoPoint::parse(lat, lng)?;
        Ok(self.api.save_store_location(store_id, point).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn record() -> StoreRecord {
        serde_json::from_value(serde_json::json!({
            "_id": "s1",
            "name": "Cake By Dee",
            "owner": "Dee",
            "username": "cakebydee",
            "phone": "+92300",
            "category": "bakery"
        }))
        .expect("record")
    }

    #[test]
    fn test_untouched_form_diffs_to_empty_patch() {
        let original = record();
        let form = ProfileForm::from_record(&original);

        let patch = form.diff(&original).expect("diff");
        assert!(patch.is_empty());
    }

    #[test]
    fn test_diff_contains_only_changed_fields() {
        let original = record();
        let mut form = ProfileForm::from_record(&original);
        form.phone = "+92111".to_string();
        form.address = "12 Flour Street".to_string();

        let patch = form.diff(&original).expect("diff");
        assert_eq!(patch.phone.as_deref(), Some("+92111"));
        assert_eq!(patch.address.as_deref(), Some("12 Flour Street"));
        assert_eq!(patch.name, None);
        assert_eq!(patch.owner, None);
        assert_eq!(patch.category, None);
    }

    #[test]
    fn test_cleared_name_is_rejected() {
        let original = record();
        let mut form = ProfileForm::from_record(&original);
        form.name = "  ".to_string();

        assert!(matches!(
            form.diff(&original).expect_err("empty name"),
            ProfileError::EmptyName
        ));
    }

    #[test]
    fn test_invalid_email_is_an_inline_error() {
        let original = record();
        let mut form = ProfileForm::from_record(&original);
        form.email = "not-an-email".to_string();

        assert!(matches!(
            form.diff(&original).expect_err("bad email"),
            ProfileError::InvalidEmail(_)
        ));
    }

    #[tokio::test]
    async fn save_with_no_changes_skips_the_network() {
        // Unroutable URL: a network call would fail
        let editor = ProfileEditor::new(BackendClient::new("http://127.0.0.1:9"));
        let original = record();
        let form = ProfileForm::from_record(&original);

        let saved = editor
            .save(&StoreId::new("s1"), &original, &form)
            .await
            .expect("no-op save");
        assert!(saved.is_none());
    }

    #[tokio::test]
    async fn save_sends_patch_and_returns_updated_record() {
        let mut server = Server::new_async().await;
        let put = server
            .mock("PUT", "/stores/s1")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"phone": "+92111"}),
            ))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "_id": "s1",
                    "name": "Cake By Dee",
                    "owner": "Dee",
                    "username": "cakebydee",
                    "phone": "+92111",
                    "category": "bakery"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let editor = ProfileEditor::new(BackendClient::new(&server.url()));
        let original = record();
        let mut form = ProfileForm::from_record(&original);
        form.phone = "+92111".to_string();

        let updated = editor
            .save(&StoreId::new("s1"), &original, &form)
            .await
            .expect("save")
            .expect("record");
        assert_eq!(updated.phone.as_deref(), Some("+92111"));
        put.assert_async().await;
    }

    #[tokio::test]
    async fn save_location_validates_ranges_before_sending() {
        let editor = ProfileEditor::new(BackendClient::new("http://127.0.0.1:9"));

        let err = editor
            .save_location(&StoreId::new("s1"), "120.0", "67.0")
            .await
            .expect_err("out of range");
        assert!(matches!(err, ProfileError::Location(_)));
    }
}
