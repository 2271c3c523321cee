//! Aurora Storefront library.
//!
//! Persisted shopper state (cart, wishlist, session) and the JSON API that
//! serves it. Built as a library so the binary, the CLI and the
//! integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod persistence;
pub mod routes;
pub mod state;
pub mod stores;
