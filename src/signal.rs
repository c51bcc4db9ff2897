use std::fmt::{Debug, Display, Formatter};
use std::ops::Not;

/// Index of a node inside a [`Network`][crate::network::Network].
///
/// Node 0 is always the constant-false node.
pub type NodeId = u32;

/// Reference to a node together with the polarity of the edge.
///
/// The polarity belongs to the reference, not to the node: the same node can be
/// used both plain and complemented by different fan-outs.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Signal(u32);

// Constructors
impl Signal {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1)
    }

    pub const fn new(node: NodeId, complemented: bool) -> Self {
        Self((node << 1) | complemented as u32)
    }

    pub const fn from_node(node: NodeId) -> Self {
        Self::new(node, false)
    }
}

// Getters
impl Signal {
    pub const fn node(self) -> NodeId {
        self.0 >> 1
    }

    /// Same node, plain polarity.
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }

    /// Flip the polarity when `cond` holds.
    pub const fn complement_if(self, cond: bool) -> Self {
        Self(self.0 ^ cond as u32)
    }
}

// Checks
impl Signal {
    pub const fn is_const(self) -> bool {
        self.node() == 0
    }

    pub const fn is_complemented(self) -> bool {
        self.0 & 1 != 0
    }
}

/// The constant signal of the given value.
impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        Self::new(0, value)
    }
}

impl Not for Signal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Not for &Signal {
    type Output = Signal;

    fn not(self) -> Self::Output {
        !*self
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.is_const(), self.is_complemented()) {
            (true, value) => write!(f, "{}", value as u8),
            (false, true) => write!(f, "!n{}", self.node()),
            (false, false) => write!(f, "n{}", self.node()),
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Signal::from(false), Signal::zero());
        assert_eq!(Signal::from(true), Signal::one());
        assert_eq!(!Signal::zero(), Signal::one());
        assert_eq!(!&Signal::one(), Signal::zero());
        for s in [Signal::zero(), Signal::one()] {
            assert!(s.is_const());
            assert_eq!(s.node(), 0);
        }
        assert!(Signal::one().is_complemented());
        assert!(!Signal::from_node(1).is_const());
    }

    #[test]
    fn test_polarity() {
        let s = Signal::from_node(7);
        assert_eq!(s.node(), 7);
        assert!(!s.is_complemented());
        assert!((!s).is_complemented());
        assert_eq!((!s).node(), 7);
        assert_eq!((!s).regular(), s);
        assert_eq!(s.complement_if(true), !s);
        assert_eq!(s.complement_if(false), s);
        assert_eq!(Signal::new(7, true), !s);
    }

    #[test]
    fn test_display() {
        assert_eq!(Signal::zero().to_string(), "0");
        assert_eq!(Signal::one().to_string(), "1");
        assert_eq!(Signal::from_node(3).to_string(), "n3");
        assert_eq!((!Signal::from_node(3)).to_string(), "!n3");
    }
}
