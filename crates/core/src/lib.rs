//! Buycom Core - Shared types library.
//!
//! This crate provides common types used across all Buycom components:
//! - `storefront` - Local storefront service (catalog proxy, cart, favorites, my ads)
//! - `cli` - Command-line tools for inspecting and maintaining persisted state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and the product summary snapshot

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
