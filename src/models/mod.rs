//! Request and Response models for the control service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{AddNodeRequest, ConnectRequest, SetInputRequest, SetLimitRequest};
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, LimitResponse, NodeResponse, NodesResponse,
    StatsResponse, ValueResponse,
};
