//! Core types for Storekeeper.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod location;
pub mod price;
pub mod status;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use location::{GeoPoint, LocationError};
pub use price::{Price, PriceError};
pub use status::{OrderStatus, StatusError};
pub use username::{Username, UsernameError};
