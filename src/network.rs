//! Gate-inverter graphs.
//!
//! A [`Network`] stores a DAG of gates of a single kind, with inverters kept on
//! the edges (see [`Signal`]). Node 0 is the constant-false node, primary inputs
//! and gates follow in creation order.
//!
//! Gates are normalized and structurally hashed on creation, so building the
//! same gate twice yields the same node. [`Network::substitute_node`] redirects
//! all references of a node to another signal, re-hashing the fan-outs it
//! touches and taking out whatever becomes unreferenced.
//!
//! Node indices are *not* a topological order once substitutions happened: use
//! [`Network::topological_order`] when one is needed.

use std::collections::HashMap;

use log::debug;

use crate::gate::{And, Gate, Maj, Normalized};
use crate::signal::{NodeId, Signal};
use crate::truth::{TruthTable, MAX_VARS};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Node<G> {
    Constant,
    Input(u32),
    Gate(G),
}

#[derive(Debug, Clone)]
pub struct Network<G: Gate> {
    nodes: Vec<Node<G>>,
    /// Number of references (gate fan-ins and primary outputs) per node.
    fanout: Vec<u32>,
    dead: Vec<bool>,
    inputs: Vec<NodeId>,
    outputs: Vec<Signal>,
    strash: HashMap<G, NodeId>,
}

/// And-inverter graph.
pub type Aig = Network<And>;

/// Majority-inverter graph.
pub type Mig = Network<Maj>;

impl<G: Gate> Network<G> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Constant],
            fanout: vec![0],
            dead: vec![false],
            inputs: Vec::new(),
            outputs: Vec::new(),
            strash: HashMap::new(),
        }
    }
}

impl<G: Gate> Default for Network<G> {
    fn default() -> Self {
        Self::new()
    }
}

// Construction
impl<G: Gate> Network<G> {
    pub fn constant(&self, value: bool) -> Signal {
        Signal::from(value)
    }

    pub fn add_input(&mut self) -> Signal {
        let index = self.inputs.len() as u32;
        let node = self.push(Node::Input(index));
        self.inputs.push(node);
        Signal::from_node(node)
    }

    /// Register a primary output, returning its position.
    pub fn add_output(&mut self, signal: Signal) -> usize {
        self.check_live(signal);
        self.fanout[signal.node() as usize] += 1;
        self.outputs.push(signal);
        self.outputs.len() - 1
    }

    /// Create (or find) the gate, after normalization.
    pub fn create_gate(&mut self, gate: G) -> Signal {
        for &fanin in gate.fanins() {
            self.check_live(fanin);
        }

        match gate.normalize() {
            Normalized::Signal(signal) => signal,
            Normalized::Gate { gate, complemented } => {
                if let Some(&node) = self.strash.get(&gate) {
                    return Signal::new(node, complemented);
                }
                for fanin in gate.fanins() {
                    self.fanout[fanin.node() as usize] += 1;
                }
                let node = self.push(Node::Gate(gate));
                self.strash.insert(gate, node);
                Signal::new(node, complemented)
            }
        }
    }

    fn push(&mut self, node: Node<G>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.fanout.push(0);
        self.dead.push(false);
        id
    }

    fn check_live(&self, signal: Signal) {
        let index = signal.node() as usize;
        assert!(index < self.nodes.len(), "Signal {} is out of range", signal);
        assert!(!self.dead[index], "Signal {} refers to a dead node", signal);
    }
}

// Getters
impl<G: Gate> Network<G> {
    /// Number of allocated nodes, dead ones included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of live gates.
    pub fn num_gates(&self) -> usize {
        self.gates().count()
    }

    pub fn input(&self, index: usize) -> Signal {
        Signal::from_node(self.inputs[index])
    }

    pub fn output(&self, index: usize) -> Signal {
        self.outputs[index]
    }

    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }

    pub fn gate(&self, node: NodeId) -> Option<&G> {
        match &self.nodes[node as usize] {
            Node::Gate(gate) => Some(gate),
            _ => None,
        }
    }

    /// Fan-ins of a gate; empty for the constant and for inputs.
    pub fn fanins(&self, node: NodeId) -> &[Signal] {
        match &self.nodes[node as usize] {
            Node::Gate(gate) => gate.fanins(),
            _ => &[],
        }
    }

    pub fn fanout_size(&self, node: NodeId) -> u32 {
        self.fanout[node as usize]
    }

    /// Live gates, in index order.
    pub fn gates(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as NodeId)
            .filter(move |&node| self.is_gate(node) && !self.is_dead(node))
    }
}

// Checks
impl<G: Gate> Network<G> {
    pub fn is_constant(&self, node: NodeId) -> bool {
        node == 0
    }

    /// Whether the node is a primary (combinational) input.
    pub fn is_ci(&self, node: NodeId) -> bool {
        matches!(self.nodes[node as usize], Node::Input(_))
    }

    pub fn is_gate(&self, node: NodeId) -> bool {
        matches!(self.nodes[node as usize], Node::Gate(_))
    }

    pub fn is_dead(&self, node: NodeId) -> bool {
        self.dead[node as usize]
    }
}

// Substitution
impl<G: Gate> Network<G> {
    /// Replace every reference to `old` by `new`.
    ///
    /// Fan-outs that collapse or become structurally equal to an existing gate
    /// are substituted in turn. Afterwards `old` and every gate left without
    /// references are taken out. Inputs and the constant are never taken out.
    ///
    /// `new` must not depend on `old`.
    pub fn substitute_node(&mut self, old: NodeId, new: Signal) {
        let mut pending = vec![(old, new)];
        let mut replaced: HashMap<NodeId, Signal> = HashMap::new();
        let mut retired = Vec::new();

        while let Some((old, new)) = pending.pop() {
            if replaced.contains_key(&old) || self.dead[old as usize] {
                continue;
            }
            let new = Self::resolve(&replaced, new);
            if new.node() == old {
                continue;
            }
            debug!("substitute(n{} => {})", old, new);

            for index in 0..self.outputs.len() {
                let output = self.outputs[index];
                if output.node() == old {
                    self.outputs[index] = new.complement_if(output.is_complemented());
                    self.fanout[old as usize] -= 1;
                    self.fanout[new.node() as usize] += 1;
                }
            }

            if let Some(gate) = self.gate(old).copied() {
                if self.strash.get(&gate) == Some(&old) {
                    self.strash.remove(&gate);
                }
            }
            replaced.insert(old, new);
            retired.push(old);

            for index in 0..self.nodes.len() {
                let node = index as NodeId;
                if self.dead[index] || replaced.contains_key(&node) {
                    continue;
                }
                let Node::Gate(gate) = self.nodes[index] else {
                    continue;
                };
                if gate.fanins().iter().any(|s| s.node() == old) {
                    if let Some(signal) = self.replace_in_node(node, gate, old, new) {
                        pending.push((node, signal));
                    }
                }
            }
        }

        for node in retired {
            self.take_out_node(node);
        }
    }

    /// Rewrite the fan-ins of `node` in place. Returns the signal the node has
    /// to be substituted with when the updated gate is not a fresh canonical gate.
    fn replace_in_node(
        &mut self,
        node: NodeId,
        gate: G,
        old: NodeId,
        new: Signal,
    ) -> Option<Signal> {
        let mut updated = gate;
        for fanin in updated.fanins_mut() {
            if fanin.node() == old {
                *fanin = new.complement_if(fanin.is_complemented());
            }
        }

        match updated.normalize() {
            Normalized::Gate {
                gate: canonical,
                complemented: false,
            } if !self.strash.contains_key(&canonical) => {
                if self.strash.get(&gate) == Some(&node) {
                    self.strash.remove(&gate);
                }
                for fanin in gate.fanins() {
                    self.fanout[fanin.node() as usize] -= 1;
                }
                for fanin in canonical.fanins() {
                    self.fanout[fanin.node() as usize] += 1;
                }
                self.nodes[node as usize] = Node::Gate(canonical);
                self.strash.insert(canonical, node);
                None
            }
            _ => Some(self.create_gate(updated)),
        }
    }

    fn resolve(replaced: &HashMap<NodeId, Signal>, mut signal: Signal) -> Signal {
        while let Some(&target) = replaced.get(&signal.node()) {
            signal = target.complement_if(signal.is_complemented());
        }
        signal
    }

    /// Mark the gate dead and release its fan-ins, recursively.
    fn take_out_node(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            let index = node as usize;
            let Node::Gate(gate) = self.nodes[index] else {
                continue;
            };
            if self.dead[index] {
                continue;
            }
            self.dead[index] = true;
            if self.strash.get(&gate) == Some(&node) {
                self.strash.remove(&gate);
            }
            for fanin in gate.fanins() {
                let f = fanin.node() as usize;
                self.fanout[f] -= 1;
                if self.fanout[f] == 0 {
                    stack.push(fanin.node());
                }
            }
        }
    }
}

// Traversal
impl<G: Gate> Network<G> {
    /// All live nodes, each one after its fan-ins.
    pub fn topological_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut visited = vec![false; self.nodes.len()];

        for root in 0..self.nodes.len() {
            if visited[root] || self.dead[root] {
                continue;
            }
            let mut stack = vec![(root as NodeId, false)];
            while let Some((node, expanded)) = stack.pop() {
                if expanded {
                    order.push(node);
                    continue;
                }
                if visited[node as usize] {
                    continue;
                }
                visited[node as usize] = true;
                stack.push((node, true));
                for fanin in self.fanins(node) {
                    if !visited[fanin.node() as usize] {
                        stack.push((fanin.node(), false));
                    }
                }
            }
        }

        order
    }

    /// Bit-parallel simulation of the primary outputs.
    ///
    /// `patterns[i]` holds 64 values of the `i`-th primary input.
    pub fn simulate(&self, patterns: &[u64]) -> Vec<u64> {
        assert_eq!(
            patterns.len(),
            self.inputs.len(),
            "Expected one pattern word per primary input"
        );

        let mut values = vec![0u64; self.nodes.len()];
        let mut fanin_values = Vec::with_capacity(G::ARITY);
        for node in self.topological_order() {
            values[node as usize] = match &self.nodes[node as usize] {
                Node::Constant => 0,
                Node::Input(i) => patterns[*i as usize],
                Node::Gate(gate) => {
                    fanin_values.clear();
                    fanin_values.extend(gate.fanins().iter().map(|&s| signal_value(&values, s)));
                    gate.simulate(&fanin_values)
                }
            };
        }

        self.outputs.iter().map(|&s| signal_value(&values, s)).collect()
    }

    /// Exhaustive simulation: the function of every primary output over the
    /// primary inputs, of which there may be at most six.
    pub fn output_functions(&self) -> Vec<TruthTable> {
        let num_vars = self.inputs.len() as u32;
        assert!(
            num_vars <= MAX_VARS,
            "Exhaustive simulation supports at most {} inputs",
            MAX_VARS
        );
        let patterns: Vec<u64> = (0..num_vars)
            .map(|var| TruthTable::nth_var(num_vars, var).bits())
            .collect();
        self.simulate(&patterns)
            .into_iter()
            .map(|bits| TruthTable::from_bits(num_vars, bits))
            .collect()
    }
}

fn signal_value(values: &[u64], signal: Signal) -> u64 {
    let value = values[signal.node() as usize];
    if signal.is_complemented() {
        !value
    } else {
        value
    }
}

impl Network<And> {
    pub fn create_and(&mut self, a: Signal, b: Signal) -> Signal {
        self.create_gate(And::new(a, b))
    }

    pub fn create_or(&mut self, a: Signal, b: Signal) -> Signal {
        !self.create_and(!a, !b)
    }

    /// Fan-ins of an AND gate, `None` for the constant and for inputs.
    pub fn and_fanins(&self, node: NodeId) -> Option<[Signal; 2]> {
        self.gate(node).map(And::inputs)
    }
}

impl Network<Maj> {
    pub fn create_maj(&mut self, a: Signal, b: Signal, c: Signal) -> Signal {
        self.create_gate(Maj::new(a, b, c))
    }

    pub fn create_and(&mut self, a: Signal, b: Signal) -> Signal {
        self.create_maj(Signal::zero(), a, b)
    }

    pub fn create_or(&mut self, a: Signal, b: Signal) -> Signal {
        self.create_maj(Signal::one(), a, b)
    }
}
