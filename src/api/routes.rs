//! API Routes
//!
//! Configures the Axum router with all cache node endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_node_handler, get_handler, health_handler, remove_node_handler, ring_handler,
    set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT|POST /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key
/// - `GET /stats` - Local store statistics
/// - `GET /health` - Health check endpoint
/// - `GET /ring` - Ring members in hash order
/// - `PUT /ring/nodes` - Add a ring member
/// - `DELETE /ring/nodes/:id` - Remove a ring member
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler).post(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/ring", get(ring_handler))
        .route("/ring/nodes", put(add_node_handler))
        .route("/ring/nodes/:id", delete(remove_node_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
