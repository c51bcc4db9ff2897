//! Replacement networks of majority gates for 4-input functions.
//!
//! A [`Replacement`] is a small majority network over the constant and four
//! leaves. Nodes are numbered `0` (constant false), `1..=4` (the leaves) and
//! `5..` (the gates, each one after its fan-ins); fan-ins are literals
//! `index << 1 | inverted`. The last gate is the output.

use std::collections::{BTreeMap, HashMap};

use log::debug;

/// Number of leaves of a replacement network.
pub const NUM_LEAVES: usize = 4;

/// Index of the first gate of a replacement network.
pub const FIRST_GATE: usize = NUM_LEAVES + 1;

/// Projections of the four leaves.
const LEAF_PATTERNS: [u16; NUM_LEAVES] = [0xaaaa, 0xcccc, 0xf0f0, 0xff00];

/// What the comparator sees of a replacement, once placed on given leaves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Candidate {
    pub cost: f64,
    /// Level of the output, given the leaf levels
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    gates: Vec<[u32; 3]>,
    depths: Vec<u32>,
    output_inverted: bool,
}

impl Replacement {
    /// `depths[i]` is the distance from node `i` to the output, splitter
    /// stages included; it is indexed like the nodes.
    pub fn new(gates: Vec<[u32; 3]>, depths: Vec<u32>, output_inverted: bool) -> Self {
        assert!(!gates.is_empty(), "A replacement needs at least one gate");
        assert_eq!(
            depths.len(),
            FIRST_GATE + gates.len(),
            "Expected one depth per node"
        );
        for (offset, gate) in gates.iter().enumerate() {
            for &literal in gate {
                assert!(
                    (literal >> 1) as usize <= NUM_LEAVES + offset,
                    "Gate {} refers to node {} which is not defined before it",
                    FIRST_GATE + offset,
                    literal >> 1
                );
            }
        }
        Self {
            gates,
            depths,
            output_inverted,
        }
    }

    /// Build a replacement whose depths are plain gate counts, without splitters.
    pub fn from_gates(gates: Vec<[u32; 3]>, output_inverted: bool) -> Self {
        let size = FIRST_GATE + gates.len();
        let mut depths = vec![0; size];
        for (offset, gate) in gates.iter().enumerate().rev() {
            let depth = depths[FIRST_GATE + offset] + 1;
            for &literal in gate {
                let fanin = (literal >> 1) as usize;
                depths[fanin] = depths[fanin].max(depth);
            }
        }
        Self::new(gates, depths, output_inverted)
    }

    /// Number of nodes, constant and leaves included.
    pub fn size(&self) -> usize {
        FIRST_GATE + self.gates.len()
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn gates(&self) -> &[[u32; 3]] {
        &self.gates
    }

    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    pub fn output_inverted(&self) -> bool {
        self.output_inverted
    }

    /// Number of references to every node, the output counting as one.
    pub fn fanout_counts(&self) -> Vec<u32> {
        let mut counts = vec![0; self.size()];
        for gate in &self.gates {
            for &literal in gate {
                counts[(literal >> 1) as usize] += 1;
            }
        }
        counts[self.size() - 1] += 1;
        counts
    }

    /// The 4-input function computed by the network.
    pub fn simulate(&self) -> u16 {
        let mut values = Vec::with_capacity(self.size());
        values.push(0u16);
        values.extend_from_slice(&LEAF_PATTERNS);
        for &gate in &self.gates {
            let [a, b, c] = gate.map(|literal| {
                let value = values[(literal >> 1) as usize];
                if literal & 1 == 1 {
                    !value
                } else {
                    value
                }
            });
            values.push((a & b) | (a & c) | (b & c));
        }
        let output = values[self.size() - 1];
        if self.output_inverted {
            !output
        } else {
            output
        }
    }
}

/// What a database is asked for: a function and the leaves it will be placed on.
#[derive(Debug, Clone, Copy)]
pub struct ReplacementQuery<'a> {
    pub function: u16,
    pub leaf_levels: [u32; NUM_LEAVES],
    /// Leaves whose fan-out does not need splitters
    pub no_splitter: [bool; NUM_LEAVES],
    /// Cost of a splitter tree, by fan-out
    pub splitters: &'a BTreeMap<u32, f64>,
}

/// Source of majority networks for 4-input functions.
pub trait ReplacementDb {
    /// The entry for `query.function` that no other entry is better than,
    /// according to `is_better(a, b)`, or `None` if there is no entry.
    fn best_replacement<F>(
        &self,
        query: &ReplacementQuery<'_>,
        is_better: F,
    ) -> Option<&Replacement>
    where
        F: Fn(&Candidate, &Candidate) -> bool;
}

/// In-memory replacement database keyed by the exact 4-input function.
#[derive(Debug, Clone)]
pub struct AqfpDb {
    entries: HashMap<u16, Vec<Replacement>>,
    gate_cost: f64,
}

impl AqfpDb {
    pub fn new(gate_cost: f64) -> Self {
        Self {
            entries: HashMap::new(),
            gate_cost,
        }
    }

    /// Add an implementation of `function`.
    pub fn add(&mut self, function: u16, replacement: Replacement) {
        let computed = replacement.simulate();
        assert_eq!(
            computed, function,
            "Replacement computes 0x{:04x} instead of 0x{:04x}",
            computed, function
        );
        self.entries.entry(function).or_default().push(replacement);
    }

    /// Number of functions with at least one entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn replacements(&self, function: u16) -> &[Replacement] {
        self.entries.get(&function).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cost and output level of `replacement` placed on the leaves of `query`.
    pub fn candidate(&self, replacement: &Replacement, query: &ReplacementQuery<'_>) -> Candidate {
        let fanouts = replacement.fanout_counts();

        let mut cost = self.gate_cost * replacement.num_gates() as f64;
        for (index, &fanout) in fanouts.iter().enumerate().skip(1) {
            if fanout <= 1 {
                continue;
            }
            if (1..=NUM_LEAVES).contains(&index) && query.no_splitter[index - 1] {
                continue;
            }
            cost += splitter_cost(query.splitters, fanout);
        }

        let depth = (1..=NUM_LEAVES)
            .filter(|&index| fanouts[index] > 0)
            .map(|index| query.leaf_levels[index - 1] + replacement.depths()[index])
            .max()
            .unwrap_or(0);

        Candidate { cost, depth }
    }
}

/// Cost of splitting a signal `fanout` ways: the entry for the smallest
/// fan-out that is at least `fanout`, or the largest one.
pub fn splitter_cost(splitters: &BTreeMap<u32, f64>, fanout: u32) -> f64 {
    splitters
        .range(fanout..)
        .next()
        .or_else(|| splitters.iter().next_back())
        .map_or(0.0, |(_, &cost)| cost)
}

impl ReplacementDb for AqfpDb {
    fn best_replacement<F>(
        &self,
        query: &ReplacementQuery<'_>,
        is_better: F,
    ) -> Option<&Replacement>
    where
        F: Fn(&Candidate, &Candidate) -> bool,
    {
        let mut best: Option<(&Replacement, Candidate)> = None;
        for replacement in self.replacements(query.function) {
            let candidate = self.candidate(replacement, query);
            let better = match &best {
                Some((_, current)) => is_better(&candidate, current),
                None => true,
            };
            if better {
                best = Some((replacement, candidate));
            }
        }

        let (replacement, candidate) = best?;
        debug!(
            "best replacement for 0x{:04x}: {} gates, cost = {}, depth = {}",
            query.function,
            replacement.num_gates(),
            candidate.cost,
            candidate.depth
        );
        Some(replacement)
    }
}
