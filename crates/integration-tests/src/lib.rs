//! Integration tests for Plantify.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p plantify-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port via
//! [`TestServer::start`], so sessions and carts never leak between tests.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::SocketAddr;

use plantify_core::Catalog;
use plantify_storefront::config::StorefrontConfig;
use plantify_storefront::state::AppState;
use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A storefront served on `127.0.0.1` with an ephemeral port.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront with default configuration and the plant catalog.
    pub async fn start() -> Self {
        let config =
            StorefrontConfig::from_lookup(|_| None).expect("default configuration is valid");
        let state = AppState::new(config, Catalog::plants());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, plantify_storefront::app(state))
                .await
                .expect("Server error");
        });

        Self { addr, handle }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A fresh browser: its own cookie jar, so its own session and cart.
    #[must_use]
    pub fn browser(&self) -> Browser {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");
        Browser {
            client,
            base: self.url(""),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One browser session against a [`TestServer`].
///
/// Clones share the cookie jar, so they act as tabs of the same browser.
#[derive(Clone)]
pub struct Browser {
    client: Client,
    base: String,
}

impl Browser {
    /// `GET path`.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .expect("GET failed")
    }

    /// `GET path` and return the body, asserting a 200.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200, "GET {path}");
        response.text().await.expect("body is text")
    }

    /// `POST /cart/add` for a product id.
    pub async fn add(&self, id: i32) -> Response {
        self.post("/cart/add", &[("id", id.to_string())]).await
    }

    /// `POST /cart/update` with a quantity delta.
    pub async fn update(&self, id: i32, delta: i32) -> Response {
        self.post(
            "/cart/update",
            &[("id", id.to_string()), ("delta", delta.to_string())],
        )
        .await
    }

    /// `POST /cart/remove` for a product id.
    pub async fn remove(&self, id: i32) -> Response {
        self.post("/cart/remove", &[("id", id.to_string())]).await
    }

    /// The header badge text, e.g. `(3)`.
    pub async fn count(&self) -> String {
        let body = self.page("/cart/count").await;
        let start = body.find('(').expect("badge has an opening paren");
        let end = body.rfind(')').expect("badge has a closing paren");
        body[start..=end].to_string()
    }

    async fn post(&self, path: &str, form: &[(&str, String)]) -> Response {
        self.client
            .post(format!("{}{path}", self.base))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }
}
