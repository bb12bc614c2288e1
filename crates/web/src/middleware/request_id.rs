//! Request ID middleware for request tracing and correlation.
//!
//! Every request gets an ID, either the one an upstream proxy sent or a
//! fresh UUID v4. It ends up on the tracing span, the Sentry scope, and the
//! `x-request-id` response header so a user-reported failure can be found.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID we are willing to echo back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Accept an upstream ID only if it is short and plain.
fn upstream_id(value: &str) -> Option<&str> {
    let value = value.trim();
    let plain = value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    (!value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN && plain).then_some(value)
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(upstream_id)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
