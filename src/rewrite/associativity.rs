//! `x · (c · m)  →  (x · m) · c`, with `c` the only critical signal.

use crate::depth::{DepthView, LevelEdit};
use crate::gate::And;
use crate::signal::{NodeId, Signal};

use super::split_critical;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Associativity {
    /// Non-critical fan-in of the rewritten gate
    pub child_to_move: Signal,
    /// Non-critical fan-in of the critical child
    pub gran_to_move: Signal,
    /// Critical fan-in of the critical child
    pub gran_critical: Signal,
}

/// Whether the levels of two fan-ins are within one of each other.
///
/// `level_2 - 1` wraps around for `level_2 == 0`, in which case the levels
/// never count as close.
pub fn levels_too_close(level_1: u32, level_2: u32) -> bool {
    level_1 >= level_2.wrapping_sub(1) && level_1 <= level_2 + 1
}

impl Associativity {
    pub fn analyze(view: &DepthView<'_, And>, node: NodeId) -> Option<Self> {
        if !view.is_on_critical_path(node) {
            return None;
        }
        let [first, second] = view.network().and_fanins(node)?;
        if levels_too_close(view.level(first.node()), view.level(second.node())) {
            return None;
        }

        let (critical, child_to_move) = split_critical(view, first, second)?;
        if view.level(critical.node()) == 0 || critical.is_complemented() {
            return None;
        }

        let [g1, g2] = view.network().and_fanins(critical.node())?;
        let (gran_critical, gran_to_move) = split_critical(view, g1, g2)?;

        Some(Self {
            child_to_move,
            gran_to_move,
            gran_critical,
        })
    }

    pub fn rebuild(&self, edit: &mut LevelEdit<'_, '_, And>) -> Signal {
        let moved = edit.create_and(self.child_to_move, self.gran_to_move);
        edit.create_and(moved, self.gran_critical)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::network::Aig;

    #[test]
    fn test_levels_too_close() {
        assert!(!levels_too_close(0, 0));
        assert!(!levels_too_close(1, 0));
        assert!(!levels_too_close(5, 0));
        assert!(levels_too_close(0, 1));
        assert!(levels_too_close(1, 1));
        assert!(levels_too_close(2, 1));
        assert!(!levels_too_close(3, 1));
        assert!(!levels_too_close(1, 3));
    }

    #[test]
    fn test_analyze() {
        let mut aig = Aig::new();
        let x1 = aig.add_input();
        let x2 = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let a = aig.create_and(x1, x2);
        let ab = aig.create_and(a, b);
        let top = aig.create_and(ab, c);
        aig.add_output(top);

        let view = DepthView::new(&mut aig);
        assert_eq!(
            Associativity::analyze(&view, top.node()),
            Some(Associativity {
                child_to_move: c,
                gran_to_move: b,
                gran_critical: a,
            })
        );
        // Fan-ins of `ab` are at levels 0 and 1.
        assert_eq!(Associativity::analyze(&view, ab.node()), None);
        assert_eq!(Associativity::analyze(&view, a.node()), None);
    }

    #[test]
    fn test_rebuild() {
        let mut aig = Aig::new();
        let x1 = aig.add_input();
        let x2 = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let a = aig.create_and(x1, x2);
        let ab = aig.create_and(a, b);
        let top = aig.create_and(ab, !c);
        aig.add_output(top);
        let before = aig.output_functions();

        let mut view = DepthView::new(&mut aig);
        let m = Associativity::analyze(&view, top.node()).unwrap();
        assert_eq!(m.child_to_move, !c);

        let mut edit = view.edit();
        let new = m.rebuild(&mut edit);
        edit.substitute_node(top.node(), new);
        edit.commit();

        assert_eq!(view.depth(), 2);
        assert_eq!(view.level(new.node()), 2);
        assert_eq!(aig.output_functions(), before);
    }

    #[test]
    fn test_complemented_child() {
        let mut aig = Aig::new();
        let x1 = aig.add_input();
        let x2 = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let a = aig.create_and(x1, x2);
        let ab = aig.create_and(a, b);
        let top = aig.create_and(!ab, c);
        aig.add_output(top);

        let view = DepthView::new(&mut aig);
        assert_eq!(Associativity::analyze(&view, top.node()), None);
    }

    #[test]
    fn test_two_critical_grandchildren() {
        let mut aig = Aig::new();
        let x1 = aig.add_input();
        let x2 = aig.add_input();
        let y1 = aig.add_input();
        let y2 = aig.add_input();
        let c = aig.add_input();
        let a = aig.create_and(x1, x2);
        let d = aig.create_and(y1, y2);
        let ad = aig.create_and(a, d);
        let top = aig.create_and(ad, c);
        aig.add_output(top);

        let view = DepthView::new(&mut aig);
        assert_eq!(Associativity::analyze(&view, top.node()), None);
    }

    #[test]
    fn test_off_critical_path() {
        let mut aig = Aig::new();
        let x1 = aig.add_input();
        let x2 = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let a = aig.create_and(x1, x2);
        let ab = aig.create_and(a, b);
        let top = aig.create_and(ab, c);
        aig.add_output(top);
        // A longer, unrelated path.
        let mut chain = aig.create_and(x1, !b);
        for _ in 0..3 {
            chain = aig.create_and(chain, !c);
            chain = !aig.create_and(!chain, x2);
        }
        aig.add_output(chain);

        let view = DepthView::new(&mut aig);
        assert!(!view.is_on_critical_path(top.node()));
        assert_eq!(Associativity::analyze(&view, top.node()), None);
    }
}
