//! Inter-node request metadata
//!
//! Two headers travel between nodes and are never required from clients:
//! - `x-replication-request: true` marks a write pushed by a peer's
//!   replication fan-out
//! - `x-forwarded-by: id1,id2` lists the nodes that have already forwarded
//!   the request, in order

use axum::http::HeaderMap;

pub const REPLICATION_HEADER: &str = "x-replication-request";
pub const FORWARDED_BY_HEADER: &str = "x-forwarded-by";

/// Routing metadata attached to an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    /// Write arrived through replication
    pub replicated: bool,
    /// Node ids that forwarded this request, oldest first
    pub forwarded_by: Vec<String>,
}

impl RequestMeta {
    /// Metadata of a request straight from a client.
    pub fn client() -> Self {
        Self::default()
    }

    pub fn replica() -> Self {
        Self {
            replicated: true,
            forwarded_by: Vec::new(),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let replicated = headers
            .get(REPLICATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let forwarded_by = headers
            .get_all(FORWARDED_BY_HEADER)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            replicated,
            forwarded_by,
        }
    }

    /// True if `node_id` already forwarded this request.
    pub fn has_visited(&self, node_id: &str) -> bool {
        self.forwarded_by.iter().any(|id| id == node_id)
    }

    /// Copy of this metadata with `node_id` appended to the forward chain.
    pub fn forwarded_through(&self, node_id: &str) -> Self {
        let mut next = self.clone();
        next.forwarded_by.push(node_id.to_string());
        next
    }

    /// Header value for the forward chain, None when empty.
    pub fn forwarded_by_header(&self) -> Option<String> {
        if self.forwarded_by.is_empty() {
            None
        } else {
            Some(self.forwarded_by.join(","))
        }
    }
}
