//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically removes expired cache entries.
///
/// Each sweep holds the store's write lock for the whole scan, so it never
/// interleaves with a concurrent `set` or `get`.
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it during shutdown.
///
/// # Example
/// ```ignore
/// let store = coordinator.store();
/// let cleanup_handle = spawn_cleanup_task(store, Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<RwLock<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.evict_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
