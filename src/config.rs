//! Configuration Module
//!
//! Handles loading and validating node configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Node configuration parameters.
///
/// Built once at startup and handed to constructors by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL other nodes use to reach this node; also its ring identity
    pub node_address: String,
    /// Base URLs of the other cluster members
    pub peers: Vec<String>,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for writes without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Timeout for forwarded and replicated requests, in milliseconds
    pub request_timeout_ms: u64,
    /// Upper bound on in-flight replication pushes
    pub replication_concurrency: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NODE_ADDRESS` - Advertised base URL (default: `http://127.0.0.1:{SERVER_PORT}`)
    /// - `PEERS` - Comma separated peer base URLs (default: none)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 8081)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `REQUEST_TIMEOUT_MS` - Peer request timeout (default: 5000)
    /// - `REPLICATION_CONCURRENCY` - Max in-flight replications (default: 64)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let server_port = parse_var("SERVER_PORT").unwrap_or(defaults.server_port);
        let node_address = env::var("NODE_ADDRESS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| normalize_address(&v))
            .unwrap_or_else(|| local_address(server_port));
        let peers = env::var("PEERS")
            .map(|v| parse_peers(&v))
            .unwrap_or_default();

        Self {
            node_address,
            peers,
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            server_port,
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            replication_concurrency: parse_var("REPLICATION_CONCURRENCY")
                .unwrap_or(defaults.replication_concurrency),
        }
    }

    /// Rejects values the node cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl == 0 {
            return Err(CacheError::InvalidConfig(
                "default_ttl must be greater than zero".to_string(),
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "cleanup_interval must be greater than zero".to_string(),
            ));
        }
        if self.replication_concurrency == 0 {
            return Err(CacheError::InvalidConfig(
                "replication_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.node_address.is_empty() {
            return Err(CacheError::InvalidConfig(
                "node_address cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Default TTL as a Duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Peer request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        let server_port = 8081;
        Self {
            node_address: local_address(server_port),
            peers: Vec::new(),
            max_entries: 1000,
            default_ttl: 3600,
            server_port,
            cleanup_interval: 60,
            request_timeout_ms: 5000,
            replication_concurrency: 64,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn local_address(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}

/// Splits a comma separated peer list, dropping blanks and trailing slashes.
pub fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(normalize_address)
        .collect()
}

/// Canonical form of a node base URL; ring ids are hashed in this form.
pub(crate) fn normalize_address(address: &str) -> String {
    address.trim().trim_end_matches('/').to_string()
}
