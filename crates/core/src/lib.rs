//! Storekeeper Core - Shared types library.
//!
//! This crate provides common types used across all Storekeeper components:
//! - `merchant` - Application library (API client, session, workflows)
//! - `cli` - The interactive store-owner shell
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, usernames,
//!   emails, coordinates, and the order status machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
