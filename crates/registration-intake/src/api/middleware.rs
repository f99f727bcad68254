//! Request logging and CORS.

use crate::config::CorsConfig;
use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, warn};

/// Permissive CORS for the registration form.
///
/// Any origin may POST JSON. OPTIONS preflights are answered here with an
/// empty 200 and never reach the handlers.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut methods = vec![Method::POST, Method::OPTIONS];
    if config.allow_get {
        methods.push(Method::GET);
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE])
}

/// Logging middleware for requests.
///
/// Client errors are logged at warn, server errors at error.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        error!(%method, %uri, %status, ?duration, "Request failed");
    } else if status.is_client_error() {
        warn!(%method, %uri, %status, ?duration, "Request rejected");
    } else {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    }

    response
}
