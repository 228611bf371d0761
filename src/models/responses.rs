//! Response DTOs for the cache node API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::ring::RingEntry;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
///
/// Statistics are local to the answering node.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub node_id: String,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(node_id: impl Into<String>, stats: &CacheStats, capacity: usize) -> Self {
        Self {
            node_id: node_id.into(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    pub node_id: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(node_id: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            node_id: node_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// One ring member as reported by GET /ring
#[derive(Debug, Clone, Serialize)]
pub struct RingMemberResponse {
    pub id: String,
    pub address: String,
    pub hash: u32,
}

impl From<&RingEntry> for RingMemberResponse {
    fn from(entry: &RingEntry) -> Self {
        Self {
            id: entry.node.id.clone(),
            address: entry.node.address.clone(),
            hash: entry.hash,
        }
    }
}

/// Response body for GET /ring and ring mutations
#[derive(Debug, Clone, Serialize)]
pub struct RingResponse {
    pub node_id: String,
    /// Members in ring order (ascending hash)
    pub members: Vec<RingMemberResponse>,
}

impl RingResponse {
    pub fn new(node_id: impl Into<String>, entries: &[RingEntry]) -> Self {
        Self {
            node_id: node_id.into(),
            members: entries.iter().map(RingMemberResponse::from).collect(),
        }
    }
}
