//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the session's cart id (see `services::cart::CartStore`).
    pub const CART_ID: &str = "cart_id";
}
