//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Health check
//! GET  /products               - Catalog grouped by category
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns "Added" button, triggers cart-updated)
//! POST /cart/update            - Change quantity by delta (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
}
