//! Cluster Module
//!
//! Routing, forwarding and replication between cache nodes.

mod client;
mod coordinator;
mod meta;

pub use client::{PeerClient, RelayedResponse};
pub use coordinator::{Coordinator, Routed};
pub use meta::{RequestMeta, FORWARDED_BY_HEADER, REPLICATION_HEADER};
