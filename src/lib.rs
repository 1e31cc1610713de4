//! Redis Items API - a small HTTP service over a key/value store
//!
//! Provides health, cache and item endpoints backed by Redis.

pub mod api;
pub mod config;
pub mod error;
pub mod items;
pub mod metrics;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
