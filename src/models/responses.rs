//! Response DTOs for the control service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, Evaluation};
use crate::graph::Data;

/// Response body for evaluating a node (GET /get/:node)
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    /// The evaluated node
    pub node: String,
    /// Its output value
    pub value: Data,
    /// Hex fingerprint the value is cached under
    pub fingerprint: String,
    /// Whether the value was served from the cache
    pub cached: bool,
}

impl ValueResponse {
    pub fn new(node: impl Into<String>, evaluation: &Evaluation<Data>) -> Self {
        Self {
            node: node.into(),
            value: Data::clone(&evaluation.value),
            fingerprint: evaluation.fingerprint.to_hex(),
            cached: evaluation.cached,
        }
    }
}

/// Response body for graph edits (PUT /nodes, /set, /connect)
#[derive(Debug, Clone, Serialize)]
pub struct NodeResponse {
    /// Success message
    pub message: String,
    /// The node that was changed
    pub node: String,
}

impl NodeResponse {
    pub fn new(node: impl Into<String>, action: &str) -> Self {
        let node = node.into();
        Self {
            message: format!("Node '{}' {} successfully", node, action),
            node,
        }
    }
}

/// Response body for listing nodes (GET /nodes)
#[derive(Debug, Clone, Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
    /// Total compute calls made by the network
    pub computations: u64,
}

/// Response body for the limit endpoints (GET/PUT /limit)
#[derive(Debug, Clone, Serialize)]
pub struct LimitResponse {
    /// Memory limit in bytes
    pub memory_limit: usize,
    /// Whether caching is enabled (limit > 0)
    pub enabled: bool,
}

impl LimitResponse {
    pub fn new(memory_limit: usize) -> Self {
        Self {
            memory_limit,
            enabled: memory_limit > 0,
        }
    }
}

/// Response body for POST /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries dropped
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} entries", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
