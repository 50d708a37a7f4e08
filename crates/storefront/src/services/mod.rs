//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Server-side carts keyed by a session's cart id

pub mod cart;

pub use cart::{CartStore, CartUpdate};
