//! Application state shared across handlers.

use std::sync::Arc;

use plantify_core::Catalog;

use crate::config::StorefrontConfig;
use crate::services::CartStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Configuration and the product
/// catalog are read-only. The [`CartStore`] holds one cart per browser session
/// and guards each behind its own lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let carts = CartStore::new(config.cart_idle_timeout);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the session carts.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }
}
