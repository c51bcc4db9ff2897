//! Truth tables of small Boolean functions.

use std::fmt::{Display, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Largest number of variables a [`TruthTable`] can hold.
pub const MAX_VARS: u32 = 6;

/// Projections of the first six variables.
const VAR_PATTERNS: [u64; 6] = [
    0xaaaa_aaaa_aaaa_aaaa,
    0xcccc_cccc_cccc_cccc,
    0xf0f0_f0f0_f0f0_f0f0,
    0xff00_ff00_ff00_ff00,
    0xffff_0000_ffff_0000,
    0xffff_ffff_0000_0000,
];

/// Truth table over at most six variables. Bit `i` holds the value of the
/// function under the assignment whose binary encoding is `i`, variable 0
/// being the least significant.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TruthTable {
    num_vars: u32,
    bits: u64,
}

const fn mask(num_vars: u32) -> u64 {
    if num_vars == MAX_VARS {
        u64::MAX
    } else {
        (1u64 << (1u32 << num_vars)) - 1
    }
}

// Constructors
impl TruthTable {
    pub fn new(num_vars: u32) -> Self {
        Self::from_bits(num_vars, 0)
    }

    pub fn from_bits(num_vars: u32, bits: u64) -> Self {
        assert!(
            num_vars <= MAX_VARS,
            "Truth tables support at most {} variables",
            MAX_VARS
        );
        Self {
            num_vars,
            bits: bits & mask(num_vars),
        }
    }

    /// Projection on the variable `var`.
    pub fn nth_var(num_vars: u32, var: u32) -> Self {
        assert!(var < num_vars, "Variable {} out of range", var);
        Self::from_bits(num_vars, VAR_PATTERNS[var as usize])
    }
}

// Getters
impl TruthTable {
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// The table of a function of at most four variables, over exactly four.
    pub fn bits16(&self) -> u16 {
        assert!(self.num_vars <= 4, "Function has more than 4 variables");
        self.extend_to(4).bits as u16
    }

    /// The same function viewed over `num_vars` variables; the added variables
    /// are not in its support.
    pub fn extend_to(&self, num_vars: u32) -> Self {
        assert!(
            num_vars >= self.num_vars,
            "Cannot shrink a truth table from {} to {} variables",
            self.num_vars,
            num_vars
        );
        let mut result = Self::from_bits(num_vars, self.bits);
        for var in self.num_vars..num_vars {
            result.bits |= result.bits << (1u32 << var);
        }
        result.bits &= mask(num_vars);
        result
    }

    pub fn is_const0(&self) -> bool {
        self.bits == 0
    }

    pub fn is_const1(&self) -> bool {
        self.bits == mask(self.num_vars)
    }
}

impl Not for TruthTable {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(self.num_vars, !self.bits)
    }
}

impl BitAnd for TruthTable {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        assert_eq!(self.num_vars, rhs.num_vars);
        Self::from_bits(self.num_vars, self.bits & rhs.bits)
    }
}

impl BitOr for TruthTable {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        assert_eq!(self.num_vars, rhs.num_vars);
        Self::from_bits(self.num_vars, self.bits | rhs.bits)
    }
}

impl BitXor for TruthTable {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        assert_eq!(self.num_vars, rhs.num_vars);
        Self::from_bits(self.num_vars, self.bits ^ rhs.bits)
    }
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let digits = ((1usize << self.num_vars) / 4).max(1);
        write!(f, "0x{:0width$x}", self.bits, width = digits)
    }
}
