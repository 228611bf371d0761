//! Routing Coordinator
//!
//! Every operation is resolved against the ring first. Keys owned by this
//! node hit the local store; everything else is forwarded to the owner and
//! the owner's reply is relayed back unchanged. Client writes committed
//! locally are then pushed to every configured peer in the background.
//!
//! Replication is best-effort: a failed push is logged and dropped, so
//! replicas may diverge until the key is written again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, info, warn};

use super::client::{PeerClient, RelayedResponse};
use super::meta::RequestMeta;
use crate::cache::{CacheStats, CacheStore};
use crate::config::{normalize_address, Config};
use crate::error::{CacheError, Result};
use crate::models::SetRequest;
use crate::ring::{HashRing, Node, RingEntry};

/// Where an operation was answered.
#[derive(Debug)]
pub enum Routed<T> {
    /// Executed against this node's store
    Local(T),
    /// Answered by the owning node
    Remote(RelayedResponse),
}

/// Per-node router owning the local store and the ring.
pub struct Coordinator {
    node: Node,
    peers: Vec<String>,
    default_ttl: Duration,
    store: Arc<RwLock<CacheStore>>,
    ring: RwLock<HashRing>,
    client: PeerClient,
    replication_slots: Arc<Semaphore>,
}

impl Coordinator {
    /// Builds the store and the ring (peers plus self) from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        // Every node hashes peers by address, so the local identity must be
        // the address too.
        let node = Node::from_address(normalize_address(&config.node_address));
        let peers: Vec<String> = config
            .peers
            .iter()
            .map(|p| normalize_address(p))
            .filter(|p| *p != node.address)
            .collect();

        let ring = HashRing::with_nodes(
            peers
                .iter()
                .map(Node::from_address)
                .chain(std::iter::once(node.clone())),
        );

        info!(
            node_id = %node.id,
            peers = peers.len(),
            ring_size = ring.len(),
            "coordinator initialized"
        );

        Ok(Self {
            node,
            peers,
            default_ttl: config.default_ttl(),
            store: Arc::new(RwLock::new(CacheStore::new(config.max_entries)?)),
            ring: RwLock::new(ring),
            client: PeerClient::new(config.request_timeout())?,
            replication_slots: Arc::new(Semaphore::new(config.replication_concurrency)),
        })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Replication targets.
    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    /// Shared handle to the local store, for the expiry sweep.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    /// Resolves the owner of `key`.
    pub async fn owner_of(&self, key: &str) -> Result<Node> {
        let ring = self.ring.read().await;
        ring.get_node(key)
            .cloned()
            .ok_or_else(|| CacheError::NoOwner(key.to_string()))
    }

    // == Set ==
    /// Stores `req` on its owner.
    ///
    /// Replicated writes are applied locally without consulting the ring and
    /// are never replicated again.
    pub async fn set(&self, req: SetRequest, meta: RequestMeta) -> Result<Routed<()>> {
        if meta.replicated {
            debug!(key = %req.key, "applying replicated write");
            self.store_locally(&req).await;
            return Ok(Routed::Local(()));
        }

        let owner = self.owner_of(&req.key).await?;
        if owner.is_self(&self.node.id) {
            let ttl = self.store_locally(&req).await;
            self.replicate(SetRequest {
                ttl: Some(ttl.as_secs()),
                ..req
            });
            return Ok(Routed::Local(()));
        }

        let meta = self.next_hop(&req.key, &meta)?;
        debug!(key = %req.key, owner = %owner.id, "forwarding write");
        let relayed = self.client.forward_set(&owner, &req, &meta).await.map_err(|e| {
            warn!(owner = %owner.address, error = %e, "failed to forward write");
            e
        })?;
        Ok(Routed::Remote(relayed))
    }

    // == Get ==
    /// Reads `key` from its owner. A local miss is `Local(None)`.
    pub async fn get(&self, key: &str, meta: RequestMeta) -> Result<Routed<Option<String>>> {
        let owner = self.owner_of(key).await?;
        if owner.is_self(&self.node.id) {
            let value = self.store.write().await.get(key);
            return Ok(Routed::Local(value));
        }

        let meta = self.next_hop(key, &meta)?;
        debug!(key = %key, owner = %owner.id, "forwarding read");
        let relayed = self.client.forward_get(&owner, key, &meta).await.map_err(|e| {
            warn!(owner = %owner.address, error = %e, "failed to forward read");
            e
        })?;
        Ok(Routed::Remote(relayed))
    }

    // == Topology ==
    /// Adds a member to the ring. Keys it now owns are not migrated.
    pub async fn add_node(&self, node: Node) {
        info!(id = %node.id, address = %node.address, "adding ring member");
        self.ring.write().await.add_node(node);
    }

    /// Removes a member from the ring. Returns false if it was unknown.
    pub async fn remove_node(&self, id: &str) -> bool {
        let removed = self.ring.write().await.remove_node(id);
        if removed {
            info!(id = %id, "removed ring member");
        }
        removed
    }

    /// Ring members in hash order.
    pub async fn ring_entries(&self) -> Vec<RingEntry> {
        self.ring.read().await.entries().to_vec()
    }

    pub async fn stats(&self) -> (CacheStats, usize) {
        let store = self.store.read().await;
        (store.stats(), store.capacity())
    }

    /// Writes `req` to the local store, returning the TTL applied.
    async fn store_locally(&self, req: &SetRequest) -> Duration {
        let ttl = req.ttl.map(Duration::from_secs).unwrap_or(self.default_ttl);
        self.store
            .write()
            .await
            .set(req.key.clone(), req.value.clone(), ttl);
        ttl
    }

    /// Appends this node to the forward chain, refusing requests that have
    /// already passed through here.
    fn next_hop(&self, key: &str, meta: &RequestMeta) -> Result<RequestMeta> {
        if meta.has_visited(&self.node.id) {
            warn!(key = %key, chain = ?meta.forwarded_by, "forwarding loop detected");
            return Err(CacheError::LoopDetected(format!(
                "request for '{}' already forwarded by {}",
                key, self.node.id
            )));
        }
        Ok(meta.forwarded_through(&self.node.id))
    }

    /// Spawns one push per peer. Pushes wait for a free replication slot, so
    /// at most `replication_concurrency` requests are in flight.
    fn replicate(&self, req: SetRequest) {
        if self.peers.is_empty() {
            return;
        }

        let req = Arc::new(req);
        for peer in &self.peers {
            let slots = self.replication_slots.clone();
            let client = self.client.clone();
            let peer = peer.clone();
            let req = req.clone();
            tokio::spawn(async move {
                let _permit = match slots.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!(peer = %peer, key = %req.key, "replication slots closed, dropping push");
                        return;
                    }
                };
                match client.replicate_set(&peer, &req).await {
                    Ok(()) => debug!(peer = %peer, key = %req.key, "replicated write"),
                    Err(e) => warn!(peer = %peer, key = %req.key, error = %e, "replication failed"),
                }
            });
        }
    }
}
