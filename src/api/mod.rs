//! API Module
//!
//! HTTP handlers and routing for the cache control service.
//!
//! # Endpoints
//! - `PUT /nodes`, `GET /nodes` - Build and list the node network
//! - `PUT /set`, `PUT /connect` - Edit node inputs
//! - `GET /get/:node` - Evaluate a node through the value cache
//! - `GET /limit`, `PUT /limit` - Inspect or change the memory limit
//! - `POST /clear` - Drop all cached values
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
