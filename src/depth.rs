//! Levels and critical paths.
//!
//! [`DepthView`] caches, for every node of a network, its level (longest path
//! from a primary input, in gates) and whether it lies on a longest path to a
//! primary output. The cache is only meaningful between structural edits:
//!
//! - all edits go through [`DepthView::edit`], whose [`LevelEdit`] token borrows
//!   the view mutably, so no level can be read while the network changes;
//! - [`LevelEdit::commit`] is the single place where levels are recomputed;
//! - an edit dropped without commit leaves the view stale, and every later read
//!   panics until [`DepthView::update_levels`] is called.

use log::debug;

use crate::gate::{And, Gate};
use crate::network::Network;
use crate::signal::{NodeId, Signal};

pub struct DepthView<'a, G: Gate> {
    ntk: &'a mut Network<G>,
    levels: Vec<u32>,
    critical: Vec<bool>,
    depth: u32,
    stale: bool,
}

impl<'a, G: Gate> DepthView<'a, G> {
    pub fn new(ntk: &'a mut Network<G>) -> Self {
        let mut view = Self {
            ntk,
            levels: Vec::new(),
            critical: Vec::new(),
            depth: 0,
            stale: true,
        };
        view.update_levels();
        view
    }

    pub fn network(&self) -> &Network<G> {
        &*self.ntk
    }

    /// Start a structural edit. Levels are stale until the edit is committed.
    pub fn edit(&mut self) -> LevelEdit<'_, 'a, G> {
        self.stale = true;
        LevelEdit { view: self }
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Recompute levels, depth and critical-path membership from scratch.
    pub fn update_levels(&mut self) {
        let size = self.ntk.size();
        self.levels = vec![0; size];
        self.critical = vec![false; size];

        for node in self.ntk.topological_order() {
            let level = self
                .ntk
                .fanins(node)
                .iter()
                .map(|f| self.levels[f.node() as usize] + 1)
                .max()
                .unwrap_or(0);
            self.levels[node as usize] = level;
        }

        self.depth = self
            .ntk
            .outputs()
            .iter()
            .map(|s| self.levels[s.node() as usize])
            .max()
            .unwrap_or(0);

        let mut stack: Vec<NodeId> = self
            .ntk
            .outputs()
            .iter()
            .map(|s| s.node())
            .filter(|&node| self.levels[node as usize] == self.depth)
            .collect();
        while let Some(node) = stack.pop() {
            if self.critical[node as usize] {
                continue;
            }
            self.critical[node as usize] = true;
            let level = self.levels[node as usize];
            for fanin in self.ntk.fanins(node) {
                let f = fanin.node() as usize;
                if self.levels[f] + 1 == level && !self.critical[f] {
                    stack.push(fanin.node());
                }
            }
        }

        self.stale = false;
        debug!("update_levels: size = {}, depth = {}", size, self.depth);
    }

    fn check_fresh(&self) {
        assert!(
            !self.stale,
            "Levels are stale: commit the edit or call update_levels() first"
        );
    }
}

// Getters
impl<G: Gate> DepthView<'_, G> {
    pub fn level(&self, node: NodeId) -> u32 {
        self.check_fresh();
        self.levels[node as usize]
    }

    pub fn is_on_critical_path(&self, node: NodeId) -> bool {
        self.check_fresh();
        self.critical[node as usize]
    }

    /// Largest level over the primary outputs.
    pub fn depth(&self) -> u32 {
        self.check_fresh();
        self.depth
    }
}

/// Token for a structural edit of the network under a [`DepthView`].
#[must_use = "levels stay stale until the edit is committed"]
pub struct LevelEdit<'v, 'a, G: Gate> {
    view: &'v mut DepthView<'a, G>,
}

impl<G: Gate> LevelEdit<'_, '_, G> {
    pub fn network(&self) -> &Network<G> {
        &*self.view.ntk
    }

    pub fn create_gate(&mut self, gate: G) -> Signal {
        self.view.ntk.create_gate(gate)
    }

    pub fn substitute_node(&mut self, old: NodeId, new: Signal) {
        self.view.ntk.substitute_node(old, new);
    }

    /// Finish the edit and exchange it for fresh levels.
    pub fn commit(self) {
        self.view.update_levels();
    }
}

impl LevelEdit<'_, '_, And> {
    pub fn create_and(&mut self, a: Signal, b: Signal) -> Signal {
        self.view.ntk.create_and(a, b)
    }
}
