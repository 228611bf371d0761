//! Peer HTTP client
//!
//! Sends forwarded operations to owning nodes and replication pushes to
//! peers. Failures are returned to the caller; nothing is retried here.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

use super::meta::{RequestMeta, FORWARDED_BY_HEADER, REPLICATION_HEADER};
use crate::error::{CacheError, Result};
use crate::models::SetRequest;
use crate::ring::Node;

/// An owner's reply, relayed to the original caller unchanged.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        match self.content_type {
            Some(ct) => {
                response.headers_mut().insert(CONTENT_TYPE, ct);
            }
            None => {
                response.headers_mut().remove(CONTENT_TYPE);
            }
        }
        response
    }
}

/// HTTP client for node-to-node traffic.
#[derive(Debug, Clone)]
pub struct PeerClient {
    client: Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to build peer client: {}", e)))?;

        Ok(Self { client })
    }

    /// Forwards a client write to its owner.
    pub async fn forward_set(
        &self,
        owner: &Node,
        req: &SetRequest,
        meta: &RequestMeta,
    ) -> Result<RelayedResponse> {
        let url = endpoint(&owner.address, &["set"])?;
        let builder = with_meta(self.client.put(url).json(req), meta);
        relay(owner, builder).await
    }

    /// Forwards a read to its owner.
    pub async fn forward_get(
        &self,
        owner: &Node,
        key: &str,
        meta: &RequestMeta,
    ) -> Result<RelayedResponse> {
        let url = endpoint(&owner.address, &["get", key])?;
        let builder = with_meta(self.client.get(url), meta);
        relay(owner, builder).await
    }

    /// Pushes a committed write to a peer, marked as a replica.
    ///
    /// A non-success status from the peer counts as a failure.
    pub async fn replicate_set(&self, peer: &str, req: &SetRequest) -> Result<()> {
        let url = endpoint(peer, &["set"])?;
        let response = with_meta(self.client.put(url).json(req), &RequestMeta::replica())
            .send()
            .await
            .map_err(|e| forward_error(peer, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CacheError::Forward {
                address: peer.to_string(),
                message: format!("peer answered {}", status),
            })
        }
    }
}

/// Builds `{base}/{segments...}`, percent-encoding each segment.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let invalid = |message: String| CacheError::Forward {
        address: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(format!("invalid node address: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| invalid("node address cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn with_meta(mut builder: RequestBuilder, meta: &RequestMeta) -> RequestBuilder {
    if meta.replicated {
        builder = builder.header(REPLICATION_HEADER, "true");
    }
    if let Some(chain) = meta.forwarded_by_header() {
        builder = builder.header(FORWARDED_BY_HEADER, chain);
    }
    builder
}

async fn relay(owner: &Node, builder: RequestBuilder) -> Result<RelayedResponse> {
    let response = builder
        .send()
        .await
        .map_err(|e| forward_error(&owner.address, e))?;

    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response
        .bytes()
        .await
        .map_err(|e| forward_error(&owner.address, e))?;

    debug!(owner = %owner.id, %status, "relaying owner response");

    Ok(RelayedResponse {
        status,
        content_type,
        body,
    })
}

fn forward_error(address: &str, err: reqwest::Error) -> CacheError {
    CacheError::Forward {
        address: address.to_string(),
        message: err.to_string(),
    }
}
