//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The cookie has no
//! `Max-Age`, so a session (and its cart) ends with the browser session or a
//! server restart.
//!
//! `MemoryStore` never sweeps expired records. A record only holds the
//! session's cart id, and the carts themselves are evicted by
//! [`crate::services::CartStore`] once idle, so what stays behind is one small
//! entry per session that ever added an item.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "plantify_session";

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
