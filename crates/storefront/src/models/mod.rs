//! Types stored outside the request: session keys and session-scoped data.

pub mod session;

pub use session::keys as session_keys;
