//! Depth-oriented algebraic rewriting of AIGs.
//!
//! # Overview
//!
//! The rewriter looks at every AND gate lying on a critical path (a longest
//! input-to-output path) and tries to restructure its neighbourhood so that the
//! critical signal goes through fewer gates, using the algebraic laws of AND:
//!
//! - **Associativity**: `x · (c · m) = (x · m) · c`. When `c` is the only
//!   critical input, the non-critical `x` and `m` are combined first, and `c`
//!   reaches the output one gate earlier.
//!
//! - **Distributivity**: `(s · a) + (s · b) = s · (a + b)`. In an AIG the OR
//!   shows up as an AND of two complemented fan-ins; when both share the
//!   critical `s`, it is factored out and skips one level.
//!
//! - **Three-layer distributivity**: `x4 · (!x3 + (c · x2))` is rewritten to
//!   `(!x3 · x4) + (c · (x2 · x4))`, which pulls the shallow `x4` into the deep
//!   AND-OR-AND chain and shortens the critical path through it by one gate.
//!
//! # Algorithm
//!
//! ```text
//! repeat
//!     changed := false
//!     for each live gate n:
//!         try associativity, distributivity, three-layer distributivity on n
//!         if one applies:
//!             build the replacement, substitute n, recompute levels
//!             changed := true
//! until not changed
//! ```
//!
//! Every rule is split into a read-only analysis of the fan-in structure,
//! which returns a match record or `None`, and a rebuild step that runs inside
//! a [`LevelEdit`]. Levels are recomputed right after each rewrite, so the next
//! analysis always sees fresh critical-path information.
//!
//! The rules fire only when the local structure guarantees that the rewritten
//! gate is shallower, so the depth of the network never increases.

use log::debug;

use crate::depth::{DepthView, LevelEdit};
use crate::gate::And;
use crate::network::Aig;
use crate::signal::{NodeId, Signal};

mod associativity;
mod distributivity;
mod three_layer;

pub use associativity::{levels_too_close, Associativity};
pub use distributivity::Distributivity;
pub use three_layer::ThreeLayerDistributivity;

/// Statistics collected during rewriting.
#[derive(Debug, Clone, Default)]
pub struct RewriteStats {
    /// Number of full passes over the gates, the final unproductive one included
    pub passes: usize,
    /// Number of associativity rewrites
    pub associativity: usize,
    /// Number of distributivity rewrites
    pub distributivity: usize,
    /// Number of three-layer distributivity rewrites
    pub three_layer_distributivity: usize,
    /// Network depth before rewriting
    pub depth_before: u32,
    /// Network depth after rewriting
    pub depth_after: u32,
}

impl RewriteStats {
    /// Total number of rewrites applied.
    pub fn total(&self) -> usize {
        self.associativity + self.distributivity + self.three_layer_distributivity
    }

    /// Number of levels removed from the network.
    pub fn depth_reduction(&self) -> u32 {
        self.depth_before.saturating_sub(self.depth_after)
    }

    fn record(&mut self, rule: &RuleMatch) {
        match rule {
            RuleMatch::Associativity(_) => self.associativity += 1,
            RuleMatch::Distributivity(_) => self.distributivity += 1,
            RuleMatch::ThreeLayerDistributivity(_) => self.three_layer_distributivity += 1,
        }
    }
}

/// A rule that applies to a given gate, with the signals it needs for the rebuild.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RuleMatch {
    Associativity(Associativity),
    Distributivity(Distributivity),
    ThreeLayerDistributivity(ThreeLayerDistributivity),
}

impl RuleMatch {
    /// Try the rules in order on `node`; the first one that applies wins.
    pub fn find(view: &DepthView<'_, And>, node: NodeId) -> Option<RuleMatch> {
        Associativity::analyze(view, node)
            .map(RuleMatch::Associativity)
            .or_else(|| Distributivity::analyze(view, node).map(RuleMatch::Distributivity))
            .or_else(|| {
                ThreeLayerDistributivity::analyze(view, node)
                    .map(RuleMatch::ThreeLayerDistributivity)
            })
    }

    /// Build the replacement of the matched gate.
    pub fn rebuild(&self, edit: &mut LevelEdit<'_, '_, And>) -> Signal {
        match self {
            RuleMatch::Associativity(m) => m.rebuild(edit),
            RuleMatch::Distributivity(m) => m.rebuild(edit),
            RuleMatch::ThreeLayerDistributivity(m) => m.rebuild(edit),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuleMatch::Associativity(_) => "associativity",
            RuleMatch::Distributivity(_) => "distributivity",
            RuleMatch::ThreeLayerDistributivity(_) => "three-layer distributivity",
        }
    }
}

/// Split two fan-ins into `(critical, non_critical)`.
///
/// Returns `None` unless exactly one of them lies on a critical path.
fn split_critical(view: &DepthView<'_, And>, a: Signal, b: Signal) -> Option<(Signal, Signal)> {
    match (
        view.is_on_critical_path(a.node()),
        view.is_on_critical_path(b.node()),
    ) {
        (true, false) => Some((a, b)),
        (false, true) => Some((b, a)),
        _ => None,
    }
}

pub struct AlgebraicRewriter<'a> {
    view: DepthView<'a, And>,
    stats: RewriteStats,
}

impl<'a> AlgebraicRewriter<'a> {
    pub fn new(aig: &'a mut Aig) -> Self {
        Self {
            view: DepthView::new(aig),
            stats: RewriteStats::default(),
        }
    }

    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Rewrite until a full pass over the gates changes nothing.
    pub fn run(&mut self) {
        self.stats.depth_before = self.view.depth();

        loop {
            let mut changed = false;
            // Gates created during the pass are visited by the next one.
            let size = self.view.network().size();
            for index in 0..size {
                let node = index as NodeId;
                let ntk = self.view.network();
                if !ntk.is_gate(node) || ntk.is_dead(node) {
                    continue;
                }
                if self.try_algebraic_rules(node) {
                    changed = true;
                }
            }
            self.stats.passes += 1;
            debug!(
                "pass {}: {} rewrites so far, depth = {}",
                self.stats.passes,
                self.stats.total(),
                self.view.depth()
            );
            if !changed {
                break;
            }
        }

        self.stats.depth_after = self.view.depth();
        debug!(
            "algebraic rewriting: depth {} -> {} with {} rewrites",
            self.stats.depth_before,
            self.stats.depth_after,
            self.stats.total()
        );
    }

    /// Try the rules on `node`. Returns `true` if the network was updated.
    fn try_algebraic_rules(&mut self, node: NodeId) -> bool {
        let Some(rule) = RuleMatch::find(&self.view, node) else {
            return false;
        };

        let mut edit = self.view.edit();
        let new = rule.rebuild(&mut edit);
        if new.node() == node {
            // The rebuild hashed back to the very same gate.
            edit.commit();
            return false;
        }
        edit.substitute_node(node, new);
        edit.commit();

        debug!("{}: n{} => {}", rule.name(), node, new);
        self.stats.record(&rule);
        true
    }
}

/// Reduce the depth of `aig` in place by algebraic rewriting, preserving the
/// function of every primary output.
pub fn aig_algebraic_rewriting(aig: &mut Aig) {
    let mut rewriter = AlgebraicRewriter::new(aig);
    rewriter.run();
}
