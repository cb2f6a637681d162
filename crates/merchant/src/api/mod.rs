//! Backend REST API client.
//!
//! All business logic - persistence, authentication, password verification,
//! order state transitions - lives behind this API. The client's job is to
//! put types on the wire formats and keep transport failures from leaking
//! upward as anything other than [`ApiError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use storekeeper_merchant::api::BackendClient;
//!
//! let api = BackendClient::new(&config.api_base_url);
//!
//! // Two-step login handshake
//! let check = api.check_username(&username).await?;
//! let verify = api.verify_password(&username, password).await?;
//!
//! // Orders for the signed-in store
//! let orders = api.orders_by_store(&store_id).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 404,
            body: "store not found".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned 404: store not found");
    }
}
