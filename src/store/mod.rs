//! Store Module
//!
//! Key/value store abstraction over the handful of Redis primitives the
//! service uses, with a Redis-backed and an in-process implementation.

mod entry;
mod memory;
mod redis_store;


use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub use entry::{current_timestamp_ms, StoreEntry, StoredValue};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

// == Store Error ==
/// Errors raised by a key/value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failure reported by the Redis client (connection, protocol, auth, ...)
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    /// Operation against a key holding the wrong kind of value
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// Stored value could not be interpreted
    #[error("{0}")]
    InvalidValue(String),
}

/// Convenience Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Store Trait ==
/// The store primitives used by the request handlers.
///
/// TTL values follow Redis conventions: `-2` when the key does not exist,
/// `-1` when it has no expiry, otherwise the remaining seconds.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Checks that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Reads a string value.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Remaining time to live of a key in seconds.
    async fn ttl(&self, key: &str) -> StoreResult<i64>;

    /// Writes a string value without expiry.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes a string value expiring after `ttl_secs` seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()>;

    /// Returns true if the key exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Sets several hash fields at once.
    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()>;

    /// Reads every field of a hash; empty when the key is missing.
    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>>;
}
