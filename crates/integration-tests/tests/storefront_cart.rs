//! End-to-end tests for the storefront views and the session cart.
//!
//! Product ids refer to the default plant catalog: 1 Snake Plant ($15),
//! 2 Fiddle Leaf Fig ($35), 3 Peace Lily ($20).

use plantify_integration_tests::TestServer;
use tokio::task::JoinSet;

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("{needle} not found in page"))
}

// =============================================================================
// Views
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let body = server.browser().page("/health").await;
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_landing_page() {
    let server = TestServer::start().await;
    let body = server.browser().page("/").await;
    assert!(body.contains("Welcome to Plantify"));
    assert!(body.contains("Get Started"));
}

#[tokio::test]
async fn test_products_grouped_by_category() {
    let server = TestServer::start().await;
    let body = server.browser().page("/products").await;

    let low_light = position(&body, "Low Light");
    let large = position(&body, "Large Plants");
    let flowering = position(&body, "Flowering");
    let succulents = position(&body, "Succulents");
    assert!(low_light < large && large < flowering && flowering < succulents);

    // ZZ Plant is listed under Low Light, before the Large Plants heading
    assert!(position(&body, "ZZ Plant") < large);
    assert!(body.contains("(0)"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await;
    let browser = server.browser();

    let response = browser.get("/products").await;
    assert!(response.headers().contains_key("x-request-id"));
}

// =============================================================================
// Cart operations
// =============================================================================

#[tokio::test]
async fn test_add_returns_added_button_and_trigger() {
    let server = TestServer::start().await;
    let browser = server.browser();

    let response = browser.add(1).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("hx-trigger").map(|v| v.to_str().ok()),
        Some(Some("cart-updated"))
    );
    let body = response.text().await.unwrap_or_default();
    assert!(body.contains("disabled"));
    assert!(body.contains("Added"));

    assert_eq!(browser.count().await, "(1)");
}

#[tokio::test]
async fn test_shopping_session() {
    let server = TestServer::start().await;
    let browser = server.browser();

    browser.add(1).await;
    browser.add(3).await;
    browser.add(1).await;

    assert_eq!(browser.count().await, "(3)");
    let cart = browser.page("/cart").await;
    assert!(cart.contains("Total Items: 3"));
    assert!(cart.contains("Total Cost: $50.00"));
    assert!(position(&cart, "Snake Plant") < position(&cart, "Peace Lily"));

    let fragment = browser.remove(3).await.text().await.unwrap_or_default();
    assert!(fragment.contains("Total Items: 2"));
    assert!(fragment.contains("Total Cost: $30.00"));
    assert!(!fragment.contains("Peace Lily"));

    assert_eq!(browser.count().await, "(2)");
}

#[tokio::test]
async fn test_decrement_to_zero_removes_line() {
    let server = TestServer::start().await;
    let browser = server.browser();

    browser.add(2).await;
    let fragment = browser.update(2, -1).await.text().await.unwrap_or_default();

    assert!(fragment.contains("Total Items: 0"));
    assert!(!fragment.contains("Fiddle Leaf Fig"));
    assert_eq!(browser.count().await, "(0)");
}

#[tokio::test]
async fn test_over_decrement_removes_line() {
    let server = TestServer::start().await;
    let browser = server.browser();

    browser.add(2).await;
    browser.add(2).await;
    browser.update(2, -5).await;

    let cart = browser.page("/cart").await;
    assert!(cart.contains("Total Items: 0"));
    assert!(cart.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_update_keeps_line_order() {
    let server = TestServer::start().await;
    let browser = server.browser();

    browser.add(1).await;
    browser.add(2).await;
    browser.add(3).await;
    let fragment = browser.update(2, 1).await.text().await.unwrap_or_default();

    let snake = position(&fragment, "Snake Plant");
    let fig = position(&fragment, "Fiddle Leaf Fig");
    let lily = position(&fragment, "Peace Lily");
    assert!(snake < fig && fig < lily);
    assert!(fragment.contains("Total Items: 4"));
    assert!(fragment.contains("Total Cost: $105.00"));
}

#[tokio::test]
async fn test_missing_lines_are_ignored() {
    let server = TestServer::start().await;
    let browser = server.browser();

    browser.add(1).await;

    let response = browser.update(5, 3).await;
    assert_eq!(response.status(), 200);
    let response = browser.remove(5).await;
    assert_eq!(response.status(), 200);

    let cart = browser.page("/cart").await;
    assert!(cart.contains("Total Items: 1"));
    assert!(cart.contains("Total Cost: $15.00"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = TestServer::start().await;
    let browser = server.browser();

    let response = browser.add(999).await;
    assert_eq!(response.status(), 404);
    assert_eq!(browser.count().await, "(0)");
}

#[tokio::test]
async fn test_products_page_resets_added_buttons() {
    let server = TestServer::start().await;
    let browser = server.browser();

    browser.add(1).await;
    let body = browser.page("/products").await;

    // Six products, six enabled buttons, even though one is in the cart
    assert_eq!(body.matches("Add to Cart").count(), 6);
    assert!(!body.contains(">Added<"));
    assert!(body.contains("(1)"));
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_sessions_have_independent_carts() {
    let server = TestServer::start().await;
    let alice = server.browser();
    let bob = server.browser();

    alice.add(1).await;
    alice.add(1).await;
    bob.add(3).await;

    assert_eq!(alice.count().await, "(2)");
    assert_eq!(bob.count().await, "(1)");

    let bobs_cart = bob.page("/cart").await;
    assert!(bobs_cart.contains("Peace Lily"));
    assert!(!bobs_cart.contains("Snake Plant"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_in_one_session_are_all_kept() {
    let server = TestServer::start().await;
    let browser = server.browser();

    // First request sets the session cookie and cart id
    browser.add(1).await;

    let mut requests = JoinSet::new();
    for i in 0..20 {
        let tab = browser.clone();
        requests.spawn(async move { tab.add(1 + i % 6).await.status() });
    }
    while let Some(status) = requests.join_next().await {
        assert_eq!(status.expect("request task panicked"), 200);
    }

    assert_eq!(browser.count().await, "(21)");
    let cart = browser.page("/cart").await;
    assert!(cart.contains("Total Items: 21"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_and_removes_in_one_session() {
    let server = TestServer::start().await;
    let browser = server.browser();

    browser.add(1).await;
    browser.add(2).await;

    let mut requests = JoinSet::new();
    for _ in 0..10 {
        let tab = browser.clone();
        requests.spawn(async move { tab.update(1, 1).await.status() });
    }
    let tab = browser.clone();
    requests.spawn(async move { tab.remove(2).await.status() });
    while let Some(status) = requests.join_next().await {
        assert_eq!(status.expect("request task panicked"), 200);
    }

    let cart = browser.page("/cart").await;
    assert!(cart.contains("Total Items: 11"));
    assert!(cart.contains("Total Cost: $165.00"));
    assert!(!cart.contains("Fiddle Leaf Fig"));
}

#[tokio::test]
async fn test_new_browser_starts_empty() {
    let server = TestServer::start().await;
    server.browser().add(1).await;

    let cart = server.browser().page("/cart").await;
    assert!(cart.contains("Total Items: 0"));
}
