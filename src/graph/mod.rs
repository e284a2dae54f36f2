//! Graph Module
//!
//! A minimal node network implementing [`crate::cache::Evaluator`], used by
//! the control service and tests to drive the cache.

mod data;
mod network;

pub use data::Data;
pub use network::{Input, Network, Node, Op};
