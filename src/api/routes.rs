//! API Routes
//!
//! Configures the Axum router with all control service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_node_handler, clear_handler, connect_handler, get_handler, get_limit_handler,
    health_handler, list_nodes_handler, set_input_handler, set_limit_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /nodes` / `GET /nodes` - Add a node / list nodes
/// - `PUT /set` - Set a literal node input
/// - `PUT /connect` - Connect one node's output to another's input
/// - `GET /get/:node` - Evaluate a node through the cache
/// - `GET /limit` / `PUT /limit` - Read / change the memory limit
/// - `POST /clear` - Drop all cached values
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/nodes", put(add_node_handler).get(list_nodes_handler))
        .route("/set", put(set_input_handler))
        .route("/connect", put(connect_handler))
        .route("/get/:node", get(get_handler))
        .route("/limit", get(get_limit_handler).put(set_limit_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
