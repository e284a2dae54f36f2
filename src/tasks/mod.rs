//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation.
//!
//! # Tasks
//! - Stats Reporter: Logs cache usage at configured intervals

mod report;

pub use report::spawn_stats_reporter;
