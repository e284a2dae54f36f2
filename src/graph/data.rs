//! Data values flowing through the demo graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::MemoryUsage;

// == Data ==
/// A value held by an input or produced by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Data {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Data {
    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Data::String(_) => "string",
            Data::Int(_) => "int",
            Data::Float(_) => "float",
            Data::Bool(_) => "bool",
        }
    }

    /// Stable byte encoding used when fingerprinting literal inputs.
    ///
    /// A type tag followed by the payload. Floats are encoded by their bit
    /// pattern, so every distinct value (infinities, NaN, -0.0) gets
    /// distinct bytes.
    pub fn state_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(9);
        match self {
            Data::String(s) => {
                bytes.push(0);
                bytes.extend_from_slice(s.as_bytes());
            }
            Data::Int(i) => {
                bytes.push(1);
                bytes.extend_from_slice(&i.to_le_bytes());
            }
            Data::Float(x) => {
                bytes.push(2);
                bytes.extend_from_slice(&x.to_bits().to_le_bytes());
            }
            Data::Bool(b) => {
                bytes.push(3);
                bytes.push(u8::from(*b));
            }
        }
        bytes
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::String(s) => f.write_str(s),
            Data::Int(i) => write!(f, "{}", i),
            Data::Float(x) => write!(f, "{}", x),
            Data::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::String(s.to_string())
    }
}

impl MemoryUsage for Data {
    fn memory_usage(&self) -> usize {
        let heap = match self {
            Data::String(s) => s.len(),
            _ => 0,
        };
        std::mem::size_of::<Data>() + heap
    }
}
