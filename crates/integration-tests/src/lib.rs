//! Integration tests for Storekeeper.
//!
//! These tests drive the merchant library end to end against a `mockito`
//! HTTP server standing in for the backend: the full login handshake, the
//! session lifecycle around persisted storage, and the order workflow's
//! enrichment and status transitions.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storekeeper-integration-tests
//! ```

use storekeeper_merchant::api::BackendClient;
use storekeeper_merchant::session::{MemorySessionStorage, SessionStore};

/// The store record fixture used across scenarios.
#[must_use]
pub fn store_record_json() -> serde_json::Value {
    serde_json::json!({
        "_id": "676a9e68b3a5d58b4c123456",
        "name": "Cake By Dee",
        "owner": "Dee",
        "username": "cakebydee",
        "phone": "+923001234567",
        "category": "bakery",
        "isActive": true
    })
}

/// A session store over in-memory storage, pointed at the mock backend.
#[must_use]
pub fn session_store(server_url: &str) -> SessionStore {
    SessionStore::new(
        BackendClient::new(server_url),
        Box::new(MemorySessionStorage::new()),
    )
}

/// Like [`session_store`], but with a record already persisted.
#[must_use]
pub fn session_store_with_record(server_url: &str, record: &serde_json::Value) -> SessionStore {
    SessionStore::new(
        BackendClient::new(server_url),
        Box::new(MemorySessionStorage::with_record(record.to_string())),
    )
}
