//! Ring Module
//!
//! Consistent-hash membership: decides which node owns a key.

mod hash_ring;
mod node;

pub use hash_ring::{ring_hash, HashRing, RingEntry};
pub use node::Node;
