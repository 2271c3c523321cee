//! Aurora Core - Shopper-state domain library.
//!
//! This crate provides the types and aggregates shared by every Aurora component:
//! - `storefront` - Local JSON API that persists and serves shopper state
//! - `cli` - Command-line tools for inspecting and resetting that state
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no file access,
//! no HTTP clients. Persistence and networking live in the storefront crate,
//! which wraps these aggregates.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and emails
//! - [`product`] - Catalog product snapshot and effective-price rules
//! - [`cart`] - Cart aggregate with quantity merging and derived totals
//! - [`wishlist`] - Deduplicated set of saved products
//! - [`account`] - Session user and partial profile updates
//! - [`catalog`] - Linear-scan filtering, sorting and hot-deal pricing
//! - [`checkout`] - Order summary, form validation and confirmation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod product;
pub mod types;
pub mod wishlist;

pub use account::{ProfileUpdate, User};
pub use cart::{Cart, CartLine};
pub use catalog::{Deal, ProductFilter, SortOrder};
pub use checkout::{CheckoutError, OrderConfirmation, OrderSummary, PaymentInfo, ShippingInfo};
pub use product::{Product, Rating};
pub use types::*;
pub use wishlist::Wishlist;
