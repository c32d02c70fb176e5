//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits
//! - Cookie parsing for the authorization gate
//!
//! No global timeout here: a proxied request takes as long as the upstream
//! client allows (see `UPSTREAM_TIMEOUT_SECONDS`).

use axum::Router;
use axum::http::header::HeaderName;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Apply HTTP-level middleware to the given Router.
pub fn apply(router: Router, body_limit: usize) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let layers = ServiceBuilder::new()
        // Generate a request id if missing, then propagate it to the response.
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        // Access log / tracing for all requests.
        .layer(TraceLayer::new_for_http())
        // A declared content-length over the limit gets 413 here. Chunked
        // bodies are cut off while the forwarder reads them.
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CookieManagerLayer::new());

    router.layer(layers)
}
