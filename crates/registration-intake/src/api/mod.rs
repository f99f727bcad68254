//! HTTP API for the intake service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{cors_layer, logging_middleware};
pub use types::*;

use crate::config::CorsConfig;
use crate::store::Store;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Lazily-connected registration store
    pub store: Arc<Store>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Create the API router with default CORS settings.
pub fn create_router(state: AppState) -> Router {
    create_router_with_cors(state, &CorsConfig::default())
}

/// Create the API router with custom CORS settings.
pub fn create_router_with_cors(state: AppState, cors: &CorsConfig) -> Router {
    let register = Router::new()
        .route(
            "/register",
            post(handlers::register).fallback(handlers::method_not_allowed),
        )
        .layer(cors_layer(cors));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(register)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
