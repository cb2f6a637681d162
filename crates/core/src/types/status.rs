//! Order status state machine.
//!
//! The backend stores an order's status as a lowercase string; this module
//! gives it a closed enum so transitions are checked at compile time instead
//! of string-compared at runtime.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a customer order.
///
/// The progression is `pending → confirmed → processing → delivered`, with
/// `cancelled` reachable as a side exit from any non-terminal state.
/// `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Delivered,
    Cancelled,
}

/// Errors produced when parsing or transitioning an [`OrderStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// The string is not a known status value.
    #[error("invalid order status: {0}")]
    Unknown(String),
    /// The requested transition is not allowed by the state machine.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Status the order currently holds.
        from: OrderStatus,
        /// Status that was requested.
        to: OrderStatus,
    },
}

impl OrderStatus {
    /// Whether the order can leave this status at all.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The forward step in the progression, if one exists.
    ///
    /// Cancellation is not a "next" status; it is a side exit available from
    /// every non-terminal state.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Processing),
            Self::Processing => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether the state machine permits moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match to {
            Self::Cancelled => true,
            Self::Confirmed => matches!(self, Self::Pending),
            Self::Processing => matches!(self, Self::Confirmed),
            Self::Delivered => matches!(self, Self::Processing),
            Self::Pending => false,
        }
    }

    /// Check a transition, producing a [`StatusError`] when it is rejected.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::InvalidTransition` when the state machine does
    /// not permit moving from `self` to `to`.
    pub const fn transition_to(self, to: Self) -> Result<Self, StatusError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StatusError::InvalidTransition { from: self, to })
        }
    }

    /// The wire string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}
