//! Item Repository
//!
//! Item records live in the store as hashes at `item:<id>`, with the highest
//! assigned id kept under `items:count`.
//!
//! Creation reads the counter and writes it back afterwards without any
//! locking, so two concurrent creates can be assigned the same id and the
//! later write wins.

use std::sync::Arc;

use tracing::{debug, info};

use crate::models::Item;
use crate::store::{KvStore, StoreError, StoreResult};

/// Counter key holding the highest assigned item id.
pub const ITEMS_COUNT_KEY: &str = "items:count";

/// Items written on first listing when the counter key is absent.
pub fn sample_items() -> Vec<Item> {
    vec![
        Item::new(1, "Item 1", "First item"),
        Item::new(2, "Item 2", "Second item"),
        Item::new(3, "Item 3", "Third item"),
    ]
}

// == Item Repository ==
/// Reads and writes item records through a [`KvStore`].
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn KvStore>,
}

impl ItemRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Highest assigned id, 0 when the counter is absent or empty.
    ///
    /// The counter is signed: a negative value lists nothing.
    async fn current_count(&self) -> StoreResult<i64> {
        let raw = self.store.get(ITEMS_COUNT_KEY).await?.unwrap_or_default();
        match raw.trim() {
            "" => Ok(0),
            trimmed => trimmed.parse().map_err(|_| {
                StoreError::InvalidValue(format!(
                    "invalid literal for {}: '{}'",
                    ITEMS_COUNT_KEY, raw
                ))
            }),
        }
    }

    // == Seed ==
    /// Writes the sample items if the counter key does not exist yet.
    ///
    /// Returns true if seeding happened.
    pub async fn seed_if_empty(&self) -> StoreResult<bool> {
        if self.store.exists(ITEMS_COUNT_KEY).await? {
            return Ok(false);
        }

        let samples = sample_items();
        for item in &samples {
            self.store
                .hset_multiple(&Item::key(item.id), &item.to_fields())
                .await?;
        }
        self.store
            .set(ITEMS_COUNT_KEY, &samples.len().to_string())
            .await?;

        info!("Seeded {} sample items", samples.len());
        Ok(true)
    }

    // == List ==
    /// Seeds if needed, then returns every item with an id in `1..=count`.
    ///
    /// Ids whose hash is missing are skipped.
    pub async fn list(&self) -> StoreResult<Vec<Item>> {
        self.seed_if_empty().await?;

        let count = self.current_count().await?;
        let mut items = Vec::new();
        for id in 1..=count.max(0) as u64 {
            let fields = self.store.hgetall(&Item::key(id)).await?;
            if let Some(item) = Item::from_fields(id, fields) {
                items.push(item);
            }
        }

        debug!("Listed {} items (counter at {})", items.len(), count);
        Ok(items)
    }

    // == Create ==
    /// Stores a new item at `count + 1` and advances the counter.
    pub async fn create(&self, name: String, description: String) -> StoreResult<Item> {
        // Ids stay positive even if the counter was set below zero.
        let new_id = self.current_count().await?.max(0) as u64 + 1;
        let item = Item::new(new_id, name, description);

        self.store
            .hset_multiple(&Item::key(new_id), &item.to_fields())
            .await?;
        self.store
            .set(ITEMS_COUNT_KEY, &new_id.to_string())
            .await?;

        info!("Created item {}", new_id);
        Ok(item)
    }
}
