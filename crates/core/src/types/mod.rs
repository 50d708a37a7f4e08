//! Core value types for Plantify.
//!
//! This module provides type-safe wrappers for product identifiers and prices.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{Price, PriceError};
