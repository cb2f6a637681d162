//! Third-party image host uploads.
//!
//! Product and store images are pushed to the hosting service as a multipart
//! form (`key`, base64 `image`, `name`); a successful upload yields a
//! permanent URL to store in the image field. Any failure - missing API key
//! included - degrades to keeping the local device reference, and the caller
//! tells the user a fallback happened.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::ImageHostConfig;

/// Errors that can occur during an upload attempt.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No API key configured; uploading is not possible.
    #[error("no image host API key configured")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("image host returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The host reported failure or sent no hosted URL.
    #[error("image host did not return a hosted URL")]
    MissingUrl,
}

/// Where an image reference ultimately points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Permanent URL on the image host.
    Hosted(String),
    /// The local device reference, kept because uploading failed or was
    /// not possible.
    Local(String),
}

impl ImageSource {
    /// The reference to store in the image field.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hosted(url) | Self::Local(url) => url,
        }
    }

    /// Whether this is the local fallback rather than a hosted URL.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

/// Client for the image hosting service.
#[derive(Debug, Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    upload_url: String,
    api_key: Option<SecretString>,
}

impl ImageHostClient {
    /// Create a client from the image host configuration.
    #[must_use]
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Upload image bytes, returning the permanent hosted URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured, the request fails, or
    /// the host rejects the upload.
    #[instrument(skip(self, bytes), fields(name = %name, size = bytes.len()))]
    pub async fn upload(&self, name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let api_key = self.api_key.as_ref().ok_or(UploadError::MissingApiKey)?;

        let form = reqwest::multipart::Form::new()
            .text("key", api_key.expose_secret().to_string())
            .text("image", BASE64.encode(bytes))
            .text("name", name.to_string());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: UploadResponse = response.json().await?;
        if !parsed.success {
            return Err(UploadError::MissingUrl);
        }

        let url = parsed.data.map(|d| d.url).ok_or(UploadError::MissingUrl)?;
        debug!(url = %url, "image uploaded");
        Ok(url)
    }

    /// Upload, degrading to the local reference on any failure.
    ///
    /// The returned [`ImageSource`] tells the caller whether a fallback
    /// happened so the user can be informed.
    pub async fn upload_or_fallback(
        &self,
        name: &str,
        bytes: &[u8],
        local_ref: &str,
    ) -> ImageSource {
        match self.upload(name, bytes).await {
            Ok(url) => ImageSource::Hosted(url),
            Err(e) => {
                warn!(error = %e, "image upload failed; keeping local reference");
                ImageSource::Local(local_ref.to_string())
            }
        }
    }
}
