//! Request DTOs for the cache node API
//!
//! Defines the structure of incoming HTTP request bodies. `SetRequest` is
//! also the body nodes send each other when forwarding or replicating.

use serde::{Deserialize, Serialize};

use crate::cache::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};

/// Request body for the SET operation (PUT/POST /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `ttl`: Optional TTL in seconds (node default if not specified)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl SetRequest {
    pub fn new(key: impl Into<String>, value: impl Into<String>, ttl: Option<u64>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ttl,
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_key(&self.key) {
            return Some(msg);
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        if self.ttl == Some(0) {
            return Some("TTL must be greater than zero".to_string());
        }
        None
    }
}

/// Checks a key against the length limits.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for adding a ring member (PUT /ring/nodes)
#[derive(Debug, Clone, Deserialize)]
pub struct AddNodeRequest {
    /// Ring identity; defaults to the address
    #[serde(default)]
    pub id: Option<String>,
    /// Base URL of the node
    pub address: String,
}

impl AddNodeRequest {
    pub fn validate(&self) -> Option<String> {
        if self.address.trim().is_empty() {
            return Some("Address cannot be empty".to_string());
        }
        if matches!(&self.id, Some(id) if id.trim().is_empty()) {
            return Some("Node id cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl": 60}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(60));
    }

    #[test]
    fn test_set_request_serialize_omits_missing_ttl() {
        let json = serde_json::to_string(&SetRequest::new("k", "v", None)).unwrap();
        assert_eq!(json, r#"{"key":"k","value":"v"}"#);
    }

    #[test]
    fn test_validate_empty_key() {
        assert!(SetRequest::new("", "test", None).validate().is_some());
    }

    #[test]
    fn test_validate_long_key() {
        let req = SetRequest::new("x".repeat(MAX_KEY_LENGTH + 1), "v", None);
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_large_value() {
        let req = SetRequest::new("k", "x".repeat(MAX_VALUE_SIZE + 1), None);
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_zero_ttl() {
        assert!(SetRequest::new("k", "v", Some(0)).validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        assert!(SetRequest::new("valid_key", "test", Some(60)).validate().is_none());
    }

    #[test]
    fn test_add_node_request_validation() {
        let req: AddNodeRequest = serde_json::from_str(r#"{"address": "http://n:1"}"#).unwrap();
        assert!(req.validate().is_none());
        assert!(req.id.is_none());

        let req: AddNodeRequest = serde_json::from_str(r#"{"address": " "}"#).unwrap();
        assert!(req.validate().is_some());

        let req: AddNodeRequest =
            serde_json::from_str(r#"{"id": "", "address": "http://n:1"}"#).unwrap();
        assert!(req.validate().is_some());
    }
}
