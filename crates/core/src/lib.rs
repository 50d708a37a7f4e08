//! Plantify Core - catalog and cart types.
//!
//! This crate holds the domain of the Plantify storefront:
//! - [`types`] - Newtype wrappers for product IDs and prices
//! - [`catalog`] - The static, read-only product catalog
//! - [`cart`] - The cart state manager (line items, mutations, totals)
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no sessions,
//! no HTTP. The storefront owns one [`Cart`] per browser session and renders it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartError, CartLineItem, LineChange};
pub use catalog::{Catalog, CatalogError, CategoryGroup, Product};
pub use types::*;
