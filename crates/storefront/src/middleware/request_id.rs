//! Request ID middleware for request tracing and correlation.
//!
//! Runs outside the trace layer. Every request leaves this middleware with an
//! `x-request-id` header (kept from an upstream proxy or freshly generated), so
//! [`make_request_span`] can put it on the request span. The same ID is tagged
//! on the Sentry scope and echoed in the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Read the request ID from a header map, if present and valid UTF-8.
#[must_use]
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Middleware that ensures every request carries a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = match request_id(request.headers()) {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    let Ok(value) = HeaderValue::from_str(&id) else {
        return next.run(request).await;
    };
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, value.clone());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &id);
    });

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, value);
    response
}

/// Span factory for `TraceLayer`: one `request` span per request.
pub fn make_request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = request_id(request.headers()).unwrap_or("-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_reads_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), Some("abc-123"));
    }

    #[test]
    fn test_empty_request_id_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));
        assert_eq!(request_id(&headers), None);
    }
}
