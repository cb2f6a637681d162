//! The two-step login flow.
//!
//! A small state machine with two steps: collect a username, prove it exists,
//! then collect the password for it. The resolved store/owner display names
//! live *inside* the password-step variant, so the stale combination "names
//! still showing after going back and editing the username" cannot be
//! represented at all.

use thiserror::Error;

use storekeeper_core::{Username, UsernameError};

use crate::session::{AuthError, Session, SessionStore};

/// Where the flow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginStep {
    /// Collecting the username.
    #[default]
    Username,
    /// Collecting the password for a username that exists. Carries the
    /// display names resolved by the existence check.
    Password {
        /// Store display name shown as context.
        store_name: String,
        /// Owner display name shown as context.
        owner_name: String,
    },
}

/// Errors surfaced by the login flow.
///
/// Input-validation variants are raised before any network call; `Auth`
/// wraps everything the session store reports.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The username field is empty.
    #[error("Please enter your username")]
    EmptyUsername,

    /// The username field fails structural validation.
    #[error(transparent)]
    InvalidUsername(UsernameError),

    /// The password field is empty.
    #[error("Please enter your password")]
    EmptyPassword,

    /// `submit_password` was called while still at the username step.
    #[error("enter your username first")]
    NotAtPasswordStep,

    /// The session store rejected the step.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Transient state of one login attempt. Never persisted.
#[derive(Debug, Default)]
pub struct LoginFlow {
    step: LoginStep,
    username: String,
    password: String,
}

impl LoginFlow {
    /// A fresh flow at the username step with empty fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> &LoginStep {
        &self.step
    }

    /// Current username field contents.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Current password field contents.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Update the username field.
    pub fn set_username(&mut self, input: impl Into<String>) {
        self.username = input.into();
    }

    /// Update the password field.
    pub fn set_password(&mut self, input: impl Into<String>) {
        self.password = input.into();
    }

    /// Submit the username step.
    ///
    /// On success the flow advances to the password step carrying the
    /// resolved display names. On any failure the flow stays at the
    /// username step.
    ///
    /// # Errors
    ///
    /// `EmptyUsername`/`InvalidUsername` before any network call; the
    /// session store's errors otherwise.
    pub async fn submit_username(
        &mut self,
        sessions: &SessionStore,
    ) -> Result<&LoginStep, LoginError> {
        let username = match Username::parse(&self.username) {
            Ok(username) => username,
            Err(UsernameError::Empty) => return Err(LoginError::EmptyUsername),
            Err(e) => return Err(LoginError::InvalidUsername(e)),
        };

        let identity = sessions.check_username(&username).await?;

        self.step = LoginStep::Password {
            store_name: identity.name,
            owner_name: identity.owner,
        };
        Ok(&self.step)
    }

    /// Return to the username step, unconditionally.
    ///
    /// Clears the password; the resolved display names are dropped with the
    /// password-step variant.
    pub fn back(&mut self) {
        self.step = LoginStep::Username;
        self.password.clear();
    }

    /// Submit the password step.
    ///
    /// On success the session is established (a side effect on the session
    /// store) and the flow fully resets - navigation away happens as a
    /// consequence of the session becoming authenticated, not as a flow
    /// transition. On failure the flow stays at the password step and the
    /// entered password is kept for an explicit retry.
    ///
    /// # Errors
    ///
    /// `NotAtPasswordStep` if the username step has not completed,
    /// `EmptyPassword` before any network call, the session store's errors
    /// otherwise.
    pub async fn submit_password(
        &mut self,
        sessions: &SessionStore,
    ) -> Result<Session, LoginError> {
        if !matches!(self.step, LoginStep::Password { .. }) {
            return Err(LoginError::NotAtPasswordStep);
        }

        if self.password.trim().is_empty() {
            return Err(LoginError::EmptyPassword);
        }

        let username = match Username::parse(&self.username) {
            Ok(username) => username,
            Err(UsernameError::Empty) => return Err(LoginError::EmptyUsername),
            Err(e) => return Err(LoginError::InvalidUsername(e)),
        };

        let session = sessions.login(&username, self.password.trim()).await?;

        self.reset();
        Ok(session)
    }

    /// Clear every field and return to the username step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
