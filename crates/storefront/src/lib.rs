//! Buycom storefront library.
//!
//! Favorites and cart state, their persistence, the catalog client and the
//! JSON API, exposed as a library so the binary, the CLI and the integration
//! tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod listings;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
