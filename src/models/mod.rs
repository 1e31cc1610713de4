//! Request and Response models for the HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod item;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use item::Item;
pub use requests::{CacheSetRequest, CreateItemRequest};
pub use responses::{
    CacheGetResponse, CacheSetResponse, ErrorResponse, HealthResponse, IndexResponse,
    ItemListResponse, ItemResponse, NotFoundResponse,
};
