//! Resynthesis of a single node into majority gates.

use std::collections::BTreeMap;

use log::debug;

use crate::aqfp::db::{
    Candidate, Replacement, ReplacementDb, ReplacementQuery, FIRST_GATE, NUM_LEAVES,
};
use crate::network::Mig;
use crate::signal::{NodeId, Signal};
use crate::truth::TruthTable;

/// How database entries are ranked.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AqfpResynStrategy {
    /// Lowest cost first, ties broken by the lowest depth
    #[default]
    CostBased,
    /// Lowest depth first, ties broken by the lowest cost
    LevelBased,
}

impl AqfpResynStrategy {
    /// Whether `a` is strictly better than `b`.
    pub fn is_better(self, a: &Candidate, b: &Candidate) -> bool {
        match self {
            AqfpResynStrategy::CostBased => {
                a.cost < b.cost || (a.cost == b.cost && a.depth < b.depth)
            }
            AqfpResynStrategy::LevelBased => {
                a.depth < b.depth || (a.depth == b.depth && a.cost < b.cost)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AqfpResynParams {
    /// Cost of a splitter tree, by fan-out
    pub splitters: BTreeMap<u32, f64>,
    pub strategy: AqfpResynStrategy,
    /// Whether primary inputs need splitters to fan out
    pub branch_pis: bool,
}

/// A signal of the destination network feeding the resynthesized node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Leaf {
    pub signal: Signal,
    pub level: u32,
}

impl Leaf {
    pub fn new(signal: Signal, level: u32) -> Self {
        Self { signal, level }
    }
}

/// Functions built without the database.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Shortcut {
    Constant(bool),
    Leaf { index: usize, complemented: bool },
}

fn shortcut(function: u16) -> Option<Shortcut> {
    let leaf = |index, complemented| Some(Shortcut::Leaf { index, complemented });
    match function {
        0x0000 => Some(Shortcut::Constant(false)),
        0xffff => Some(Shortcut::Constant(true)),
        0x5555 => leaf(0, true),
        0xaaaa => leaf(0, false),
        0x3333 => leaf(1, true),
        0xcccc => leaf(1, false),
        0x0f0f => leaf(2, true),
        0xf0f0 => leaf(2, false),
        0x00ff => leaf(3, true),
        0xff00 => leaf(3, false),
        _ => None,
    }
}

/// Replaces a node of at most four inputs by the best majority network of a
/// [`ReplacementDb`].
pub struct AqfpNodeResyn<'db, D: ReplacementDb> {
    db: &'db D,
    params: AqfpResynParams,
}

impl<'db, D: ReplacementDb> AqfpNodeResyn<'db, D> {
    pub fn new(db: &'db D, params: AqfpResynParams) -> Self {
        Self { db, params }
    }

    pub fn params(&self) -> &AqfpResynParams {
        &self.params
    }

    /// Build `function` of `leaves` into `ntk`.
    ///
    /// `level_update` is called with the node and level of every gate
    /// instantiated from the database, in creation order. `result` is called
    /// once with the output signal and its level.
    ///
    /// # Panics
    ///
    /// Panics with more than four leaves, with a function of more than four
    /// variables, or when the database has no entry for a function that is
    /// neither constant nor a single literal.
    pub fn resynthesize<L, R>(
        &self,
        ntk: &mut Mig,
        function: &TruthTable,
        leaves: &[Leaf],
        mut level_update: L,
        result: R,
    ) where
        L: FnMut(NodeId, u32),
        R: FnOnce(Signal, u32),
    {
        assert!(
            leaves.len() <= NUM_LEAVES,
            "Expected at most {} leaves, got {}",
            NUM_LEAVES,
            leaves.len()
        );

        let mut leaf_signals = [ntk.constant(false); NUM_LEAVES];
        let mut leaf_levels = [0; NUM_LEAVES];
        let mut no_splitter = [true; NUM_LEAVES];
        for (i, leaf) in leaves.iter().enumerate() {
            let node = leaf.signal.node();
            leaf_signals[i] = leaf.signal;
            leaf_levels[i] = leaf.level;
            no_splitter[i] = ntk.is_constant(node) || (ntk.is_ci(node) && !self.params.branch_pis);
        }

        let bits = function.bits16();
        if let Some(shortcut) = shortcut(bits) {
            let (signal, level) = match shortcut {
                Shortcut::Constant(value) => (ntk.constant(value), 0),
                Shortcut::Leaf { index, complemented } => {
                    (leaf_signals[index].complement_if(complemented), leaf_levels[index])
                }
            };
            debug!("resynthesize 0x{:04x}: {:?} => {}", bits, shortcut, signal);
            result(signal, level);
            return;
        }

        let query = ReplacementQuery {
            function: bits,
            leaf_levels,
            no_splitter,
            splitters: &self.params.splitters,
        };
        let strategy = self.params.strategy;
        let best = self.db.best_replacement(&query, |a, b| strategy.is_better(a, b));
        let Some(replacement) = best else {
            panic!("No replacement for function 0x{:04x} in the database", bits);
        };

        let (signal, level) =
            instantiate(ntk, replacement, &leaf_signals, &leaf_levels, &mut level_update);
        debug!(
            "resynthesize 0x{:04x}: {} gates => {} at level {}",
            bits,
            replacement.num_gates(),
            signal,
            level
        );
        result(signal, level);
    }
}

/// Build the gates of `replacement` on top of the leaves, in index order.
fn instantiate<L>(
    ntk: &mut Mig,
    replacement: &Replacement,
    leaf_signals: &[Signal; NUM_LEAVES],
    leaf_levels: &[u32; NUM_LEAVES],
    level_update: &mut L,
) -> (Signal, u32)
where
    L: FnMut(NodeId, u32),
{
    let depths = replacement.depths();
    let mut signals = Vec::with_capacity(replacement.size());
    let mut levels = Vec::with_capacity(replacement.size());
    signals.push(ntk.constant(false));
    levels.push(0);
    signals.extend_from_slice(leaf_signals);
    levels.extend_from_slice(leaf_levels);

    for (offset, &gate) in replacement.gates().iter().enumerate() {
        let index = FIRST_GATE + offset;
        let [a, b, c] =
            gate.map(|literal| signals[(literal >> 1) as usize].complement_if(literal & 1 == 1));
        let signal = ntk.create_maj(a, b, c);
        let node = signal.node();

        // A fan-in deeper in the replacement than one stage below leaves room for splitters.
        let level = if ntk.is_constant(node) || ntk.is_ci(node) {
            0
        } else {
            gate.iter()
                .map(|&literal| {
                    let fanin = (literal >> 1) as usize;
                    let distance = if depths[fanin] > depths[index] {
                        depths[fanin] - depths[index]
                    } else {
                        1
                    };
                    levels[fanin] + distance
                })
                .max()
                .unwrap_or(0)
        };

        signals.push(signal);
        levels.push(level);
        level_update(node, level);
    }

    let output = replacement.size() - 1;
    (
        signals[output].complement_if(replacement.output_inverted()),
        levels[output],
    )
}
