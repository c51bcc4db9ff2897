//! Node resynthesis for AQFP (adiabatic quantum-flux parametron) logic.
//!
//! The logic primitive of AQFP is the 3-input majority gate, and a signal
//! driving more than one gate needs splitters, which add both cost and delay.
//! [`AqfpNodeResyn`] replaces one node of at most four inputs by the best
//! majority network a [`ReplacementDb`] has for its function, given the levels
//! of the leaves it is built on:
//!
//! - constants and single literals are built directly;
//! - otherwise, the entries of the database are ranked by cost or by depth
//!   (see [`AqfpResynStrategy`]) and the best one is instantiated gate by gate
//!   into the destination [`Mig`][crate::network::Mig].

mod db;
mod resyn;

pub use db::{
    splitter_cost, AqfpDb, Candidate, Replacement, ReplacementDb, ReplacementQuery, FIRST_GATE,
    NUM_LEAVES,
};
pub use resyn::{AqfpNodeResyn, AqfpResynParams, AqfpResynStrategy, Leaf};
