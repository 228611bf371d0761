//! Cluster member identity.

use serde::{Deserialize, Serialize};

/// A cluster member: ring identity plus the base URL it is reachable at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub address: String,
}

impl Node {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
        }
    }

    /// A peer identified by its own address.
    pub fn from_address(address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            id: address.clone(),
            address,
        }
    }

    pub fn is_self(&self, local_id: &str) -> bool {
        self.id == local_id
    }
}
