//! Three-layer distributivity.
//!
//! A critical chain `x4 · !(x3 · !(c · x2))`, that is `x4 · (!x3 + c · x2)`,
//! is rewritten to `(!x3 · x4) + (c · (x2 · x4))`. The shallow `x4` moves two
//! layers down, and `c` reaches the output through one gate less.

use crate::depth::{DepthView, LevelEdit};
use crate::gate::And;
use crate::signal::{NodeId, Signal};

use super::split_critical;

/// Smallest level difference between the critical fan-in and `x4`.
const MIN_LEVEL_GAP: u32 = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ThreeLayerDistributivity {
    /// Critical signal at the bottom of the chain
    pub critical: Signal,
    pub x2: Signal,
    pub x3: Signal,
    pub x4: Signal,
}

impl ThreeLayerDistributivity {
    pub fn analyze(view: &DepthView<'_, And>, node: NodeId) -> Option<Self> {
        if !view.is_on_critical_path(node) {
            return None;
        }
        let ntk = view.network();

        let [f1, f2] = ntk.and_fanins(node)?;
        let (layer1, x4) = split_critical(view, f1, f2)?;
        if !layer1.is_complemented() {
            return None;
        }
        // The gap is computed with wrapping, and a negative one is not rejected.
        if view.level(layer1.node()).wrapping_sub(view.level(x4.node())) < MIN_LEVEL_GAP {
            return None;
        }

        let [f1, f2] = ntk.and_fanins(layer1.node())?;
        let (layer2, x3) = split_critical(view, f1, f2)?;
        if !layer2.is_complemented() {
            return None;
        }

        let [f1, f2] = ntk.and_fanins(layer2.node())?;
        let (critical, x2) = split_critical(view, f1, f2)?;

        Some(Self { critical, x2, x3, x4 })
    }

    pub fn rebuild(&self, edit: &mut LevelEdit<'_, '_, And>) -> Signal {
        let and_x3_x4 = edit.create_and(!self.x3, self.x4);
        let and_x2_x4 = edit.create_and(self.x2, self.x4);
        let and_critical = edit.create_and(self.critical, and_x2_x4);
        let updated = edit.create_and(!and_x3_x4, !and_critical);
        !updated
    }
}
