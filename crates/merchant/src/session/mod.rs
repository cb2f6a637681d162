//! Authenticated session ownership and lifecycle.
//!
//! The [`SessionStore`] is the single source of truth for "who is logged
//! in". It restores the persisted record at startup, runs both halves of the
//! login handshake against the backend, and is the only component that ever
//! constructs a [`Session`] - which can therefore only come from a
//! successfully verified credential result.

mod storage;

pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage, StorageError};

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

use storekeeper_core::{StoreId, Username};

use crate::api::{ApiError, BackendClient, StoreIdentity, StoreRecord};

/// Errors surfaced by the session store's operations.
///
/// `Display` carries the human-readable message the shell shows at the
/// current login step.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The username-existence check came back negative.
    #[error("{0}")]
    UsernameNotFound(String),

    /// The password verification came back negative.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The backend confirmed the password but sent no store record.
    #[error("backend did not return a store record")]
    MissingStore,

    /// The verified record could not be persisted; no session was created.
    #[error("failed to persist session: {0}")]
    Persist(String),

    /// Transport or backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The authenticated store owner.
///
/// Only the [`SessionStore`] constructs these; everything else receives
/// clones and treats them as immutable snapshots.
#[derive(Debug, Clone)]
pub struct Session {
    record: StoreRecord,
}

impl Session {
    fn from_verified(record: StoreRecord) -> Self {
        Self { record }
    }

    /// Backend identifier of the signed-in store.
    #[must_use]
    pub const fn store_id(&self) -> &StoreId {
        &self.record.id
    }

    /// Store display name.
    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.record.name
    }

    /// Owner display name.
    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.record.owner
    }

    /// Login username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.record.username
    }

    /// The full store record the backend returned at verification time.
    #[must_use]
    pub const fn record(&self) -> &StoreRecord {
        &self.record
    }
}

#[derive(Debug)]
struct State {
    session: Option<Session>,
    restoring: bool,
}

/// Single source of truth for the authenticated identity.
pub struct SessionStore {
    api: BackendClient,
    storage: Box<dyn SessionStorage>,
    state: Mutex<State>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a session store over the given backend and storage.
    ///
    /// The store starts in the restoring state; call [`Self::restore`]
    /// before consulting [`Self::is_authenticated`].
    #[must_use]
    pub fn new(api: BackendClient, storage: Box<dyn SessionStorage>) -> Self {
        Self {
            api,
            storage,
            state: Mutex::new(State {
                session: None,
                restoring: true,
            }),
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// Any read or parse failure degrades to "not authenticated" - startup
    /// must never be blocked by a bad record. The restoring flag is cleared
    /// whether or not a session was recovered, and calling this again
    /// without an intervening login/logout yields the same state.
    ///
    /// Returns whether a session is now present.
    pub fn restore(&self) -> bool {
        let restored = match self.storage.load() {
            Ok(Some(raw)) => match serde_json::from_str::<StoreRecord>(&raw) {
                Ok(record) => {
                    debug!(store_id = %record.id, "session restored from storage");
                    Some(Session::from_verified(record))
                }
                Err(e) => {
                    warn!(error = %e, "stored session record unparseable; treating as signed out");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read stored session; treating as signed out");
                None
            }
        };

        let mut state = self.lock_state();
        state.session = restored;
        state.restoring = false;
        state.session.is_some()
    }

    /// First step of the handshake: does this username exist?
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameNotFound` with the backend's message (or
    /// a default) when the lookup is negative, `AuthError::Api` on
    /// transport failure. Never touches session state.
    pub async fn check_username(&self, username: &Username) -> Result<StoreIdentity, AuthError> {
        let response = self.api.check_username(username).await?;

        if response.success
            && let Some(identity) = response.store
        {
            return Ok(identity);
        }

        Err(AuthError::UsernameNotFound(
            response
                .error
                .unwrap_or_else(|| "User not found".to_string()),
        ))
    }

    /// Second step: verify the password and establish the session.
    ///
    /// On a positive match the returned store record is persisted
    /// (overwriting any previous one) and becomes the in-memory session.
    /// On any failure the existing session, if any, is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a negative match,
    /// `AuthError::Persist` if the verified record cannot be written,
    /// `AuthError::Api` on transport failure.
    pub async fn login(&self, username: &Username, password: &str) -> Result<Session, AuthError> {
        let response = self.api.verify_password(username, password).await?;

        if !response.password_matches {
            return Err(AuthError::InvalidCredentials(
                response
                    .error
                    .unwrap_or_else(|| "Invalid credentials".to_string()),
            ));
        }

        let record = response.store.ok_or(AuthError::MissingStore)?;

        // Persist first: a session exists if and only if storage holds a
        // verified credential result.
        let raw = serde_json::to_string(&record).map_err(|e| AuthError::Persist(e.to_string()))?;
        self.storage
            .save(&raw)
            .map_err(|e| AuthError::Persist(e.to_string()))?;

        let session = Session::from_verified(record);
        let mut state = self.lock_state();
        state.session = Some(session.clone());
        debug!(store_id = %session.store_id(), "session established");

        Ok(session)
    }

    /// Destroy the session and its persisted record.
    ///
    /// A storage-clear failure is logged, not surfaced; the in-memory
    /// session is gone either way.
    pub fn logout(&self) {
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "failed to clear persisted session");
        }
        let mut state = self.lock_state();
        state.session = None;
        debug!("session cleared");
    }

    /// A snapshot of the current session, if authenticated.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.lock_state().session.clone()
    }

    /// Whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_state().session.is_some()
    }

    /// Whether [`Self::restore`] has yet to complete.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.lock_state().restoring
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn save(&self, _record: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn clear(&self) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    fn store_record_json() -> String {
        serde_json::json!({
            "_id": "676a9e68b3a5d58b4c123456",
            "name": "Cake By Dee",
            "owner": "Dee",
            "username": "cakebydee"
        })
        .to_string()
    }

    fn session_store_with(storage: Box<dyn SessionStorage>) -> SessionStore {
        // No requests are issued by the tests below; the URL just has to
        // be well-formed.
        SessionStore::new(BackendClient::new("http://127.0.0.1:9"), storage)
    }

    #[test]
    fn test_restore_recovers_stored_record() {
        let store =
            session_store_with(Box::new(MemorySessionStorage::with_record(store_record_json())));

        assert!(store.is_restoring());
        assert!(store.restore());
        assert!(!store.is_restoring());
        assert!(store.is_authenticated());

        let session = store.current().expect("session");
        assert_eq!(session.username(), "cakebydee");
        assert_eq!(session.store_name(), "Cake By Dee");
    }

    #[test]
    fn test_restore_is_idempotent() {
        let store =
            session_store_with(Box::new(MemorySessionStorage::with_record(store_record_json())));

        assert!(store.restore());
        let first = store.current().expect("session");
        assert!(store.restore());
        let second = store.current().expect("session");

        assert_eq!(first.store_id(), second.store_id());
        assert!(!store.is_restoring());
    }

    #[test]
    fn test_restore_degrades_on_garbage_record() {
        let store =
            session_store_with(Box::new(MemorySessionStorage::with_record("not json at all")));

        assert!(!store.restore());
        assert!(!store.is_authenticated());
        assert!(!store.is_restoring());
    }

    #[test]
    fn test_restore_degrades_on_storage_failure() {
        let store = session_store_with(Box::new(FailingStorage));

        assert!(!store.restore());
        assert!(!store.is_authenticated());
        // The restoring flag clears even when the read fails
        assert!(!store.is_restoring());
    }

    #[test]
    fn test_logout_swallows_storage_failure() {
        let store = session_store_with(Box::new(FailingStorage));
        // Must not panic or surface the error
        store.logout();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let storage = MemorySessionStorage::with_record(store_record_json());
        let store = session_store_with(Box::new(storage));
        store.restore();
        assert!(store.is_authenticated());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.current().is_none());
    }
}
