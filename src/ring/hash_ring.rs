//! Consistent Hash Ring
//!
//! Nodes and keys share one 32-bit hash space. A key belongs to the first node
//! whose hash is greater than or equal to the key's hash, wrapping around to
//! the smallest node hash past the end of the ring.

use sha2::{Digest, Sha256};

use super::Node;

/// Hashes an identifier onto the ring: the first four bytes of its SHA-256
/// digest read as a big-endian integer.
pub fn ring_hash(id: &str) -> u32 {
    let digest = Sha256::digest(id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// One occupied point of the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingEntry {
    pub hash: u32,
    pub node: Node,
}

/// Nodes sorted by hash ascending.
#[derive(Debug, Clone, Default)]
pub struct HashRing {
    entries: Vec<RingEntry>,
}

impl HashRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ring from a node list.
    pub fn with_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        let mut ring = Self::new();
        for node in nodes {
            ring.add_node(node);
        }
        ring
    }

    /// Inserts `node` at its hash position.
    ///
    /// Adding an id that is already present replaces that member in place.
    pub fn add_node(&mut self, node: Node) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.node.id == node.id) {
            existing.node = node;
            return;
        }

        let hash = ring_hash(&node.id);
        // Equal hashes keep insertion order.
        let pos = self.entries.partition_point(|e| e.hash <= hash);
        self.entries.insert(pos, RingEntry { hash, node });
    }

    /// Removes the member with `id`. Returns false if it was not on the ring.
    pub fn remove_node(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e.node.id == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns the owner of `key`, or None when the ring is empty.
    pub fn get_node(&self, key: &str) -> Option<&Node> {
        if self.entries.is_empty() {
            return None;
        }

        let hash = ring_hash(key);
        let idx = self.entries.partition_point(|e| e.hash < hash);
        let idx = if idx == self.entries.len() { 0 } else { idx };
        self.entries.get(idx).map(|e| &e.node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.node.id == id)
    }

    /// Members in ring order.
    pub fn entries(&self) -> &[RingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
