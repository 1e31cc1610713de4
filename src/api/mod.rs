//! API Module
//!
//! HTTP handlers and routing for the REST API.
//!
//! # Endpoints
//! - `GET /` - Service description and endpoint map
//! - `GET /health` - Health check against the store
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api/cache/{key}` - Read a cache entry and its TTL
//! - `POST /api/cache/{key}` - Write a cache entry with a TTL
//! - `GET /api/items` - List items, seeding samples on first use
//! - `POST /api/items` - Create an item

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
