//! Network Module
//!
//! A small graph of named nodes used to drive the value cache. Each node
//! applies an [`Op`] to its inputs; inputs are literal values or the output
//! of another node.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::cache::{fingerprint, Evaluator, Fingerprint, UpstreamState, ValueCache};
use crate::error::{CacheError, Result};
use crate::graph::Data;

// == Op ==
/// Computation performed by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Output equals the single input
    Passthrough,
    /// Concatenates the display form of every input
    Concat,
    /// Uppercases a single string input
    Uppercase,
    /// Sums numeric inputs; any float promotes the result to float
    Add,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Passthrough => "passthrough",
            Op::Concat => "concat",
            Op::Uppercase => "uppercase",
            Op::Add => "add",
        }
    }

    /// Applies the op to already-resolved input values.
    pub fn apply(&self, slot: &str, inputs: &[Data]) -> Result<Data> {
        match self {
            Op::Passthrough => match inputs {
                [value] => Ok(value.clone()),
                _ => Err(arity(slot, "exactly 1", inputs.len())),
            },
            Op::Concat => {
                if inputs.is_empty() {
                    return Err(arity(slot, "at least 1", 0));
                }
                Ok(Data::String(inputs.iter().map(Data::to_string).collect()))
            }
            Op::Uppercase => match inputs {
                [Data::String(s)] => Ok(Data::String(s.to_uppercase())),
                [other] => Err(CacheError::compute(
                    slot,
                    format!("uppercase expects a string, got {}", other.type_name()),
                )),
                _ => Err(arity(slot, "exactly 1", inputs.len())),
            },
            Op::Add => add(slot, inputs),
        }
    }
}

fn arity(slot: &str, expected: &str, got: usize) -> CacheError {
    CacheError::compute(slot, format!("expected {} input(s), got {}", expected, got))
}

fn add(slot: &str, inputs: &[Data]) -> Result<Data> {
    if inputs.is_empty() {
        return Err(arity(slot, "at least 1", 0));
    }

    if inputs.iter().any(|d| matches!(d, Data::Float(_))) {
        let mut total = 0.0;
        for input in inputs {
            total += match input {
                Data::Int(i) => *i as f64,
                Data::Float(x) => *x,
                other => return Err(not_numeric(slot, other)),
            };
        }
        return Ok(Data::Float(total));
    }

    let mut total: i64 = 0;
    for input in inputs {
        let Data::Int(i) = input else {
            return Err(not_numeric(slot, input));
        };
        total = total
            .checked_add(*i)
            .ok_or_else(|| CacheError::compute(slot, "integer overflow"))?;
    }
    Ok(Data::Int(total))
}

fn not_numeric(slot: &str, value: &Data) -> CacheError {
    CacheError::compute(slot, format!("add expects numbers, got {}", value.type_name()))
}

// == Input ==
/// Where a node input takes its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Value(Data),
    Connection(String),
}

// == Node ==
#[derive(Debug, Clone)]
pub struct Node {
    pub op: Op,
    pub inputs: Vec<Input>,
}

// == Network ==
/// Named nodes whose outputs are evaluated through a [`ValueCache`].
///
/// Connections are checked on creation, so the network is always acyclic.
#[derive(Debug, Default)]
pub struct Network {
    nodes: HashMap<String, Node>,
    /// Number of compute calls, cached results excluded
    computations: AtomicU64,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    // == Add Node ==
    /// Adds a node with no inputs.
    pub fn add_node(&mut self, name: impl Into<String>, op: Op) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(CacheError::InvalidRequest("Node name cannot be empty".to_string()));
        }
        if self.nodes.contains_key(&name) {
            return Err(CacheError::InvalidRequest(format!(
                "Node '{}' already exists",
                name
            )));
        }

        self.nodes.insert(
            name,
            Node {
                op,
                inputs: Vec::new(),
            },
        );
        Ok(())
    }

    // == Set Input ==
    /// Sets input `index` of `node` to a literal value.
    ///
    /// `index` may address an existing input or append one past the end.
    pub fn set_input(&mut self, node: &str, index: usize, value: Data) -> Result<()> {
        self.place_input(node, index, Input::Value(value))
    }

    // == Connect ==
    /// Feeds the output of `source` into input `index` of `node`.
    pub fn connect(&mut self, node: &str, index: usize, source: &str) -> Result<()> {
        if !self.nodes.contains_key(source) {
            return Err(CacheError::InvalidSlot(source.to_string()));
        }
        if self.depends_on(source, node) {
            return Err(CacheError::InvalidRequest(format!(
                "Connecting '{}' into '{}' would create a cycle",
                source, node
            )));
        }

        self.place_input(node, index, Input::Connection(source.to_string()))
    }

    fn place_input(&mut self, node: &str, index: usize, input: Input) -> Result<()> {
        let target = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| CacheError::InvalidSlot(node.to_string()))?;

        match index.cmp(&target.inputs.len()) {
            std::cmp::Ordering::Less => target.inputs[index] = input,
            std::cmp::Ordering::Equal => target.inputs.push(input),
            std::cmp::Ordering::Greater => {
                return Err(CacheError::InvalidRequest(format!(
                    "Input index {} out of range for '{}' ({} inputs)",
                    index,
                    node,
                    target.inputs.len()
                )))
            }
        }
        Ok(())
    }

    /// True if `node` is `target` or reads from it, directly or not.
    ///
    /// Each node is visited at most once, however many paths lead to it.
    fn depends_on(&self, node: &str, target: &str) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![node];

        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(n) = self.nodes.get(current) {
                for input in &n.inputs {
                    if let Input::Connection(source) = input {
                        pending.push(source.as_str());
                    }
                }
            }
        }
        false
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Node names in sorted order.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Upstream state of `slot`, reusing fingerprints already worked out in
    /// this walk so a source reached by several paths is hashed once.
    fn state_of<'a>(
        &'a self,
        slot: &str,
        memo: &mut HashMap<&'a str, Fingerprint>,
    ) -> Result<UpstreamState> {
        let node = self
            .nodes
            .get(slot)
            .ok_or_else(|| CacheError::InvalidSlot(slot.to_string()))?;

        let mut state = UpstreamState::new().with("op", node.op.name());
        for (index, input) in node.inputs.iter().enumerate() {
            let name = format!("in{}", index);
            match input {
                Input::Value(value) => state.insert(name, value.state_bytes()),
                Input::Connection(source) => {
                    let source_fp = self.fingerprint_of(source, memo)?;
                    state.insert(name, source_fp.as_bytes());
                }
            }
        }
        Ok(state)
    }

    fn fingerprint_of<'a>(
        &'a self,
        slot: &'a str,
        memo: &mut HashMap<&'a str, Fingerprint>,
    ) -> Result<Fingerprint> {
        if let Some(fp) = memo.get(slot) {
            return Ok(*fp);
        }
        let state = self.state_of(slot, memo)?;
        let fp = fingerprint(slot, &state);
        memo.insert(slot, fp);
        Ok(fp)
    }
}

// == Evaluator ==
impl Evaluator for Network {
    type Value = Data;

    fn upstream_state(&self, slot: &str) -> Result<UpstreamState> {
        self.state_of(slot, &mut HashMap::new())
    }

    fn compute(&self, slot: &str, cache: &ValueCache<Data>) -> Result<Data> {
        let node = self
            .nodes
            .get(slot)
            .ok_or_else(|| CacheError::InvalidSlot(slot.to_string()))?;
        self.computations.fetch_add(1, Ordering::Relaxed);

        let mut values = Vec::with_capacity(node.inputs.len());
        for input in &node.inputs {
            match input {
                Input::Value(value) => values.push(value.clone()),
                Input::Connection(source) => {
                    let value = cache.get_value(self, source)?;
                    values.push(Data::clone(&value));
                }
            }
        }

        node.op.apply(slot, &values)
    }
}
