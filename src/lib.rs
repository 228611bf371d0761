//! Ring Cache - a replicated in-memory cache node
//!
//! Each node keeps a local LRU+TTL store, routes every key to its owner on a
//! consistent-hash ring, and pushes local writes to its peers.

pub mod api;
pub mod cache;
pub mod cluster;
pub mod config;
pub mod error;
pub mod models;
pub mod ring;
pub mod tasks;

pub use api::AppState;
pub use cluster::Coordinator;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
