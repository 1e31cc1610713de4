//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies. Fields are only
//! checked for presence; missing values are stored as empty strings.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::config::DEFAULT_CACHE_TTL;

/// Message Redis gives for a non-numeric or out-of-range TTL.
const TTL_NOT_INTEGER: &str = "value is not an integer or out of range";

/// Request body for `POST /api/cache/{key}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSetRequest {
    /// The value to store; any JSON scalar is accepted
    #[serde(default)]
    pub value: Option<Value>,
    /// TTL in seconds as sent by the caller, number or numeric string
    #[serde(default)]
    pub ttl: Option<Value>,
}

impl CacheSetRequest {
    /// Reads the request from an arbitrary JSON body.
    ///
    /// Only a non-object body is refused; field types are not checked here.
    pub fn from_body(body: Value) -> Result<Self, String> {
        object_body(body)
    }

    /// The value as it will be written to the store.
    pub fn value_text(&self) -> String {
        store_text(self.value.as_ref())
    }

    /// The TTL to apply, falling back to one hour.
    ///
    /// Integers and integer strings pass through; anything else fails the
    /// way `SETEX` would reject it.
    pub fn ttl_secs(&self) -> Result<u64, String> {
        let secs = match &self.ttl {
            None | Some(Value::Null) => return Ok(DEFAULT_CACHE_TTL),
            Some(Value::Number(n)) => n.as_i64().ok_or(TTL_NOT_INTEGER)?,
            Some(Value::String(s)) => s.parse::<i64>().map_err(|_| TTL_NOT_INTEGER)?,
            Some(_) => return Err(TTL_NOT_INTEGER.to_string()),
        };
        if secs <= 0 {
            return Err("invalid expire time in 'setex' command".to_string());
        }
        Ok(secs as u64)
    }

    /// The TTL echoed back to the caller, exactly as supplied.
    pub fn ttl_echo(&self) -> Value {
        match &self.ttl {
            None | Some(Value::Null) => Value::from(DEFAULT_CACHE_TTL),
            Some(ttl) => ttl.clone(),
        }
    }
}

/// Request body for `POST /api/items`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

impl CreateItemRequest {
    /// Reads the request from an arbitrary JSON body; fails unless it is an object.
    pub fn from_body(body: Value) -> Result<Self, String> {
        object_body(body)
    }

    pub fn name_text(&self) -> String {
        store_text(self.name.as_ref())
    }

    pub fn description_text(&self) -> String {
        store_text(self.description.as_ref())
    }
}

fn object_body<T: DeserializeOwned>(body: Value) -> Result<T, String> {
    let kind = match &body {
        Value::Object(_) => return serde_json::from_value(body).map_err(|e| e.to_string()),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
    };
    Err(format!("expected a JSON object body, got {}", kind))
}

/// Renders a JSON value the way it is persisted: strings verbatim, `null`
/// or absent as the empty string, anything else as its JSON text.
fn store_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
