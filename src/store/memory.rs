//! Memory Store Module
//!
//! In-process key/value store with TTL expiration, mirroring the subset of
//! Redis semantics the service relies on.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvStore, StoreEntry, StoreError, StoreResult, StoredValue};

// == Memory Store ==
/// Key/value storage held in process memory.
///
/// Expired entries are dropped lazily on access and by
/// [`crate::tasks::spawn_cleanup_task`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Looks up a live entry and applies `f` to it, dropping it first if it
    /// has expired.
    async fn with_live<T>(&self, key: &str, f: impl FnOnce(Option<&StoreEntry>) -> T) -> T {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return f(Some(entry)),
                None => return f(None),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(StoreEntry::is_expired) {
            entries.remove(key);
        }
        f(entries.get(key))
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_live(key, |entry| match entry.map(|e| &e.value) {
            Some(StoredValue::Str(value)) => Ok(Some(value.clone())),
            Some(StoredValue::Hash(_)) => Err(StoreError::WrongType),
            None => Ok(None),
        })
        .await
    }

    async fn ttl(&self, key: &str) -> StoreResult<i64> {
        self.with_live(key, |entry| {
            Ok(match entry {
                None => -2,
                Some(entry) => entry
                    .ttl_remaining()
                    .map(|secs| secs as i64)
                    .unwrap_or(-1),
            })
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let entry = StoreEntry::new(StoredValue::Str(value.to_string()), None);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()> {
        if ttl_secs == 0 {
            return Err(StoreError::InvalidValue(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }
        let entry = StoreEntry::new(StoredValue::Str(value.to_string()), Some(ttl_secs));
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.with_live(key, |entry| Ok(entry.is_some())).await
    }

    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(StoreEntry::is_expired) {
            entries.remove(key);
        }

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::new(StoredValue::Hash(HashMap::new()), None));

        match &mut entry.value {
            StoredValue::Hash(map) => {
                for (field, value) in fields {
                    map.insert((*field).to_string(), value.clone());
                }
                Ok(())
            }
            StoredValue::Str(_) => Err(StoreError::WrongType),
        }
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        self.with_live(key, |entry| match entry.map(|e| &e.value) {
            Some(StoredValue::Hash(map)) => Ok(map.clone()),
            Some(StoredValue::Str(_)) => Err(StoreError::WrongType),
            None => Ok(HashMap::new()),
        })
        .await
    }
}
