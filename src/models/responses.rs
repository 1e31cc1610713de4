//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::Item;

/// Response body for `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

impl IndexResponse {
    pub fn new() -> Self {
        let endpoints = BTreeMap::from([
            ("health", "/health"),
            ("metrics", "/metrics"),
            ("cache_test", "/api/cache/<key>"),
            ("items", "/api/items"),
        ]);
        Self {
            message: "Rust API with Redis",
            version: env!("CARGO_PKG_VERSION"),
            endpoints,
        }
    }
}

impl Default for IndexResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Wall-clock seconds since the process started, not CPU time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    /// Store connectivity, present when healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<String>,
    /// Failure detail, present when unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    /// Creates a healthy response with current timestamp
    pub fn healthy(uptime: f64) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime: Some(uptime),
            redis: Some("connected".to_string()),
            error: None,
        }
    }

    /// Creates an unhealthy response carrying the ping failure
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime: None,
            redis: None,
            error: Some(error.into()),
        }
    }
}

/// Response body for `GET /api/cache/{key}`
#[derive(Debug, Clone, Serialize)]
pub struct CacheGetResponse {
    pub success: bool,
    pub key: String,
    pub value: String,
    /// Remaining TTL in seconds as reported by the store
    pub ttl: i64,
}

impl CacheGetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>, ttl: i64) -> Self {
        Self {
            success: true,
            key: key.into(),
            value: value.into(),
            ttl,
        }
    }
}

/// Response body for `POST /api/cache/{key}`
#[derive(Debug, Clone, Serialize)]
pub struct CacheSetResponse {
    pub success: bool,
    pub message: String,
    /// TTL as the caller supplied it, or the default
    pub ttl: Value,
}

impl CacheSetResponse {
    pub fn new(key: &str, ttl: Value) -> Self {
        Self {
            success: true,
            message: format!("Key \"{}\" set successfully", key),
            ttl,
        }
    }
}

/// Response body for `GET /api/items`
#[derive(Debug, Clone, Serialize)]
pub struct ItemListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Item>,
}

impl ItemListResponse {
    pub fn new(data: Vec<Item>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Response body for `POST /api/items`
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub data: Item,
}

impl ItemResponse {
    pub fn new(data: Item) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body for a lookup that found nothing (`{success:false, message}`)
#[derive(Debug, Clone, Serialize)]
pub struct NotFoundResponse {
    pub success: bool,
    pub message: String,
}

impl NotFoundResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Error response body (`{success:false, error}`)
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_lists_endpoints() {
        let json = serde_json::to_value(IndexResponse::new()).unwrap();
        assert_eq!(json["endpoints"]["health"], "/health");
        assert_eq!(json["endpoints"]["metrics"], "/metrics");
        assert_eq!(json["endpoints"]["cache_test"], "/api/cache/<key>");
        assert_eq!(json["endpoints"]["items"], "/api/items");
        assert!(json["version"].is_string());
    }

    #[test]
    fn test_health_healthy_serialize() {
        let json = serde_json::to_value(HealthResponse::healthy(1.5)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["redis"], "connected");
        assert_eq!(json["uptime"], 1.5);
        assert!(json["timestamp"].is_string());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_health_unhealthy_serialize() {
        let json = serde_json::to_value(HealthResponse::unhealthy("Connection refused")).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "Connection refused");
        assert!(json.get("redis").is_none());
        assert!(json.get("uptime").is_none());
    }

    #[test]
    fn test_cache_set_response_message() {
        let resp = CacheSetResponse::new("greeting", Value::from(3600));
        assert_eq!(resp.message, "Key \"greeting\" set successfully");
        assert!(resp.success);
    }

    #[test]
    fn test_item_list_counts_data() {
        let resp = ItemListResponse::new(vec![Item::new(1, "a", ""), Item::new(2, "b", "")]);
        assert_eq!(resp.count, 2);
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_value(ErrorResponse::new("Something went wrong")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Something went wrong");
    }
}
