//! Storekeeper Merchant - the store-owner application library.
//!
//! Everything the shell needs, with no UI attached:
//!
//! - [`api`] - typed REST client for the product/store/order backend
//! - [`session`] - authenticated identity, persisted across restarts
//! - [`login`] - the two-step username/password handshake
//! - [`orders`] - order fetch + enrichment and the status workflow
//! - [`permissions`] - the device capability gate
//! - [`catalog`] - product drafts, validation, and CRUD
//! - [`profile`] - store profile editing and location saves
//! - [`images`] - third-party image host uploads with local fallback
//! - [`config`] - environment-driven application configuration
//!
//! # Architecture
//!
//! Each component takes its collaborators explicitly (the API client, a
//! storage implementation, a permissions backend), so any of them can be
//! constructed and driven in a test without a UI tree or a live backend.
//! Async operations return typed results; converting those into alerts,
//! toasts, or inline field messages is entirely the shell's job.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod images;
pub mod login;
pub mod orders;
pub mod permissions;
pub mod profile;
pub mod session;
