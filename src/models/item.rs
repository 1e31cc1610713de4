//! Item model
//!
//! Items are persisted as Redis hashes at `item:<id>`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named record with a monotonically assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub description: String,
}

impl Item {
    pub fn new(id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Store key holding this item's hash.
    pub fn key(id: u64) -> String {
        format!("item:{}", id)
    }

    /// Hash fields written for this item.
    pub fn to_fields(&self) -> [(&'static str, String); 3] {
        [
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("description", self.description.clone()),
        ]
    }

    /// Rebuilds an item from its hash, or None for an empty hash.
    ///
    /// `fallback_id` is used when the `id` field is missing or not a number.
    pub fn from_fields(fallback_id: u64, mut fields: HashMap<String, String>) -> Option<Self> {
        if fields.is_empty() {
            return None;
        }
        let id = fields
            .get("id")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(fallback_id);
        Some(Self {
            id,
            name: fields.remove("name").unwrap_or_default(),
            description: fields.remove("description").unwrap_or_default(),
        })
    }
}
