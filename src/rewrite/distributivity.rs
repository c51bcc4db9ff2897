//! `(s · a) + (s · b)  →  s · (a + b)`, with `s` critical.
//!
//! In an AIG the OR is the AND of both complemented products, and the result
//! is built as `!(s · !(!a · !b))`.

use crate::depth::{DepthView, LevelEdit};
use crate::gate::And;
use crate::signal::{NodeId, Signal};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Distributivity {
    /// Critical signal appearing in both products
    pub shared: Signal,
    /// Other factor of the first product
    pub a: Signal,
    /// Other factor of the second product
    pub b: Signal,
}

impl Distributivity {
    pub fn analyze(view: &DepthView<'_, And>, node: NodeId) -> Option<Self> {
        if !view.is_on_critical_path(node) {
            return None;
        }
        let ntk = view.network();
        let [first, second] = ntk.and_fanins(node)?;
        for fanin in [first, second] {
            if view.level(fanin.node()) == 0
                || !view.is_on_critical_path(fanin.node())
                || !fanin.is_complemented()
            {
                return None;
            }
        }

        let [a0, a1] = ntk.and_fanins(first.node())?;
        let [b0, b1] = ntk.and_fanins(second.node())?;

        let mut shared = None;
        let mut other = None;
        for b in [b0, b1] {
            if shared.is_none() && (b == a0 || b == a1) {
                if !view.is_on_critical_path(b.node()) {
                    return None;
                }
                shared = Some(b);
            } else {
                other = Some(b);
            }
        }
        let shared = shared?;
        let b = other?;
        let a = if shared == a0 { a1 } else { a0 };

        if view.is_on_critical_path(a.node()) || view.is_on_critical_path(b.node()) {
            return None;
        }

        Some(Self { shared, a, b })
    }

    pub fn rebuild(&self, edit: &mut LevelEdit<'_, '_, And>) -> Signal {
        let inner = edit.create_and(!self.a, !self.b);
        let updated = edit.create_and(self.shared, !inner);
        !updated
    }
}
