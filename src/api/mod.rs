//! API Module
//!
//! HTTP handlers and routing for the cache node REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair (also accepts POST)
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /stats` - Get local cache statistics
//! - `GET /health` - Health check endpoint
//! - `GET /ring`, `PUT /ring/nodes`, `DELETE /ring/nodes/:id` - Ring membership

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
