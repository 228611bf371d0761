//! API Handlers
//!
//! HTTP request handlers for each cache node endpoint. Handlers translate
//! HTTP into coordinator calls and back; routing decisions live in
//! [`Coordinator`].

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

use crate::cluster::{Coordinator, RequestMeta, Routed};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, AddNodeRequest, GetResponse, HealthResponse, RingResponse, SetRequest,
    SetResponse, StatsResponse,
};
use crate::ring::Node;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Coordinator::new(config)?))
    }
}

/// Handler for PUT/POST /set
///
/// Stores a key-value pair on its owning node with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = payload.map_err(|e| CacheError::InvalidRequest(e.body_text()))?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = req.key.clone();
    match state
        .coordinator
        .set(req, RequestMeta::from_headers(&headers))
        .await?
    {
        Routed::Local(()) => Ok(Json(SetResponse::new(key)).into_response()),
        Routed::Remote(relayed) => Ok(relayed.into_response()),
    }
}

/// Handler for GET /get/:key
///
/// Retrieves a value from its owning node.
pub async fn get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Response> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    match state
        .coordinator
        .get(&key, RequestMeta::from_headers(&headers))
        .await?
    {
        Routed::Local(Some(value)) => Ok(Json(GetResponse::new(key, value)).into_response()),
        Routed::Local(None) => Err(CacheError::NotFound(key)),
        Routed::Remote(relayed) => Ok(relayed.into_response()),
    }
}

/// Handler for GET /stats
///
/// Returns statistics of this node's local store.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (stats, capacity) = state.coordinator.stats().await;
    Json(StatsResponse::new(
        state.coordinator.node().id.clone(),
        &stats,
        capacity,
    ))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.coordinator.node().id.clone()))
}

/// Handler for GET /ring
pub async fn ring_handler(State(state): State<AppState>) -> Json<RingResponse> {
    ring_response(&state).await
}

/// Handler for PUT /ring/nodes
pub async fn add_node_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddNodeRequest>, JsonRejection>,
) -> Result<Json<RingResponse>> {
    let Json(req) = payload.map_err(|e| CacheError::InvalidRequest(e.body_text()))?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let address = req.address.trim().trim_end_matches('/').to_string();
    let node = match req.id {
        Some(id) => Node::new(id, address),
        None => Node::from_address(address),
    };
    state.coordinator.add_node(node).await;

    Ok(ring_response(&state).await)
}

/// Handler for DELETE /ring/nodes/:id
pub async fn remove_node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RingResponse>> {
    if !state.coordinator.remove_node(&id).await {
        return Err(CacheError::NodeNotFound(id));
    }
    Ok(ring_response(&state).await)
}

async fn ring_response(state: &AppState) -> Json<RingResponse> {
    let entries = state.coordinator.ring_entries().await;
    Json(RingResponse::new(
        state.coordinator.node().id.clone(),
        &entries,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn test_state() -> AppState {
        let config = Config {
            node_address: "http://127.0.0.1:1".to_string(),
            max_entries: 100,
            ..Config::default()
        };
        AppState::from_config(&config).unwrap()
    }

    async fn set(state: &AppState, req: SetRequest) -> Result<Response> {
        set_handler(State(state.clone()), HeaderMap::new(), Ok(Json(req))).await
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let response = set(&state, SetRequest::new("test_key", "test_value", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_handler(
            State(state.clone()),
            HeaderMap::new(),
            Path("test_key".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(
            State(state),
            HeaderMap::new(),
            Path("nonexistent".to_string()),
        )
        .await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let result = set(&state, SetRequest::new("", "value", None)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));

        let result = set(&state, SetRequest::new("k", "value", Some(0))).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.node_id, "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_ring_add_and_remove() {
        let state = test_state();

        let req = AddNodeRequest {
            id: None,
            address: "http://127.0.0.1:2/".to_string(),
        };
        let response = add_node_handler(State(state.clone()), Ok(Json(req)))
            .await
            .unwrap();
        assert_eq!(response.members.len(), 2);
        assert!(response.members.iter().any(|m| m.id == "http://127.0.0.1:2"));

        let result =
            remove_node_handler(State(state.clone()), Path("http://127.0.0.1:2".to_string()))
                .await;
        assert!(result.is_ok());

        let result = remove_node_handler(State(state), Path("unknown".to_string())).await;
        assert!(matches!(result, Err(CacheError::NodeNotFound(ref id)) if id == "unknown"));
    }
}
