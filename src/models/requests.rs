//! Request DTOs for the control service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::graph::{Data, Op};

/// Request body for adding a node (PUT /nodes)
#[derive(Debug, Clone, Deserialize)]
pub struct AddNodeRequest {
    /// Name of the new node, also the slot evaluated by GET /get/:node
    pub name: String,
    /// Computation the node performs
    pub op: Op,
}

impl AddNodeRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_name("Node name", &self.name)
    }
}

/// Request body for setting a literal input (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetInputRequest {
    /// Node whose input is set
    pub node: String,
    /// Input index (defaults to the first input)
    #[serde(default)]
    pub index: usize,
    /// Literal value
    pub value: Data,
}

impl SetInputRequest {
    pub fn validate(&self) -> Option<String> {
        validate_name("Node name", &self.node)
    }
}

/// Request body for connecting two nodes (PUT /connect)
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectRequest {
    /// Node receiving the connection
    pub node: String,
    /// Input index (defaults to the first input)
    #[serde(default)]
    pub index: usize,
    /// Node whose output feeds the input
    pub source: String,
}

impl ConnectRequest {
    pub fn validate(&self) -> Option<String> {
        validate_name("Node name", &self.node).or_else(|| validate_name("Source", &self.source))
    }
}

/// Request body for changing the memory limit (PUT /limit)
///
/// Negative values are accepted and clamp to 0, which disables the cache.
#[derive(Debug, Clone, Deserialize)]
pub struct SetLimitRequest {
    pub bytes: i64,
}

fn validate_name(what: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return Some(format!("{} cannot be empty", what));
    }
    if name.len() > 256 {
        return Some(format!("{} exceeds maximum length of 256 characters", what));
    }
    None
}
