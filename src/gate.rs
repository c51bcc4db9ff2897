use std::fmt::Debug;
use std::hash::Hash;

use crate::signal::Signal;

/// Outcome of bringing a gate into canonical form.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Normalized<G> {
    /// The gate is trivial and computes an already existing signal.
    Signal(Signal),
    /// Canonical gate, whose output has to be complemented when `complemented` is set.
    Gate { gate: G, complemented: bool },
}

/// A single-output logic gate with a fixed number of fan-ins.
pub trait Gate: Copy + Eq + Hash + Debug {
    const ARITY: usize;

    fn fanins(&self) -> &[Signal];
    fn fanins_mut(&mut self) -> &mut [Signal];

    /// Sort fan-ins and apply the local simplifications of the gate.
    fn normalize(self) -> Normalized<Self>;

    /// Evaluate 64 patterns at once. `values` holds the fan-in values with the
    /// edge polarities already applied, in fan-in order.
    fn simulate(&self, values: &[u64]) -> u64;
}

/// Two-input AND gate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct And([Signal; 2]);

/// Three-input majority gate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Maj([Signal; 3]);

// Constructors
impl And {
    pub fn new(a: Signal, b: Signal) -> And {
        And([a, b])
    }
}

impl Maj {
    pub fn new(a: Signal, b: Signal, c: Signal) -> Maj {
        Maj([a, b, c])
    }
}

// Getters
impl And {
    pub fn left(&self) -> Signal {
        self.0[0]
    }

    pub fn right(&self) -> Signal {
        self.0[1]
    }

    pub fn inputs(&self) -> [Signal; 2] {
        self.0
    }
}

impl Maj {
    pub fn inputs(&self) -> [Signal; 3] {
        self.0
    }
}

impl Gate for And {
    const ARITY: usize = 2;

    fn fanins(&self) -> &[Signal] {
        &self.0
    }

    fn fanins_mut(&mut self) -> &mut [Signal] {
        &mut self.0
    }

    fn normalize(self) -> Normalized<Self> {
        let [mut a, mut b] = self.0;
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }

        // Constants sort first, so only `a` can be one.
        if a == b {
            return Normalized::Signal(a);
        }
        if a == !b || a == Signal::zero() {
            return Normalized::Signal(Signal::zero());
        }
        if a == Signal::one() {
            return Normalized::Signal(b);
        }

        Normalized::Gate {
            gate: And([a, b]),
            complemented: false,
        }
    }

    fn simulate(&self, values: &[u64]) -> u64 {
        values[0] & values[1]
    }
}

impl Gate for Maj {
    const ARITY: usize = 3;

    fn fanins(&self) -> &[Signal] {
        &self.0
    }

    fn fanins_mut(&mut self) -> &mut [Signal] {
        &mut self.0
    }

    fn normalize(self) -> Normalized<Self> {
        let mut inputs = self.0;
        inputs.sort();
        let [a, b, c] = inputs;

        // After sorting, both equal and complementary signals are neighbours.
        if a == b || b == c {
            return Normalized::Signal(b);
        }
        if a == !b {
            return Normalized::Signal(c);
        }
        if b == !c {
            return Normalized::Signal(a);
        }

        // Self-duality: M(!a, !b, c) = !M(a, b, !c).
        let complemented = inputs.iter().filter(|s| s.is_complemented()).count() >= 2;
        if complemented {
            inputs = inputs.map(|s| !s);
        }

        Normalized::Gate {
            gate: Maj(inputs),
            complemented,
        }
    }

    fn simulate(&self, values: &[u64]) -> u64 {
        let (a, b, c) = (values[0], values[1], values[2]);
        (a & b) | (a & c) | (b & c)
    }
}
