//! API Handlers
//!
//! HTTP request handlers for each control service endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{clamp_limit, ValueCache};
use crate::error::{CacheError, Result};
use crate::graph::{Data, Network};
use crate::models::{
    AddNodeRequest, ClearResponse, ConnectRequest, HealthResponse, LimitResponse, NodeResponse,
    NodesResponse, SetInputRequest, SetLimitRequest, StatsResponse, ValueResponse,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes itself; the network sits behind an RwLock so
/// evaluations run concurrently and graph edits are exclusive.
#[derive(Clone)]
pub struct AppState {
    /// Shared value cache
    pub cache: Arc<ValueCache<Data>>,
    /// Node network evaluated through the cache
    pub network: Arc<RwLock<Network>>,
}

impl AppState {
    /// Creates a new AppState with the given cache and an empty network.
    pub fn new(cache: ValueCache<Data>) -> Self {
        Self {
            cache: Arc::new(cache),
            network: Arc::new(RwLock::new(Network::new())),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(ValueCache::new(config.memory_limit))
    }
}

/// Handler for PUT /nodes
///
/// Adds a node to the network.
pub async fn add_node_handler(
    State(state): State<AppState>,
    Json(req): Json<AddNodeRequest>,
) -> Result<Json<NodeResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut network = state.network.write().await;
    network.add_node(req.name.clone(), req.op)?;

    Ok(Json(NodeResponse::new(req.name, "added")))
}

/// Handler for GET /nodes
pub async fn list_nodes_handler(State(state): State<AppState>) -> Json<NodesResponse> {
    let network = state.network.read().await;

    Json(NodesResponse {
        nodes: network.node_names(),
        computations: network.computations(),
    })
}

/// Handler for PUT /set
///
/// Sets a literal input value on a node.
pub async fn set_input_handler(
    State(state): State<AppState>,
    Json(req): Json<SetInputRequest>,
) -> Result<Json<NodeResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut network = state.network.write().await;
    network.set_input(&req.node, req.index, req.value)?;

    Ok(Json(NodeResponse::new(req.node, "updated")))
}

/// Handler for PUT /connect
///
/// Feeds one node's output into another node's input.
pub async fn connect_handler(
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<NodeResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut network = state.network.write().await;
    network.connect(&req.node, req.index, &req.source)?;

    Ok(Json(NodeResponse::new(req.node, "connected")))
}

/// Handler for GET /get/:node
///
/// Evaluates a node's output through the cache.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(node): Path<String>,
) -> Result<Json<ValueResponse>> {
    // Evaluation is synchronous and may be expensive, so it runs on the
    // blocking pool holding an owned read lock on the network
    let network = state.network.clone().read_owned().await;
    let cache = Arc::clone(&state.cache);
    let slot = node.clone();
    let evaluation =
        tokio::task::spawn_blocking(move || cache.evaluate(&*network, &slot)).await??;

    Ok(Json(ValueResponse::new(node, &evaluation)))
}

/// Handler for GET /limit
pub async fn get_limit_handler(State(state): State<AppState>) -> Json<LimitResponse> {
    Json(LimitResponse::new(state.cache.memory_limit()))
}

/// Handler for PUT /limit
///
/// Changes the cache memory limit. Negative values clamp to 0.
pub async fn set_limit_handler(
    State(state): State<AppState>,
    Json(req): Json<SetLimitRequest>,
) -> Json<LimitResponse> {
    let limit = clamp_limit(req.bytes);
    state.cache.set_memory_limit(limit);

    Json(LimitResponse::new(state.cache.memory_limit()))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.clear();
    info!("Cache cleared via API");

    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
