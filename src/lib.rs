//! # logic-resyn: depth-oriented logic rewriting
//!
//! **`logic-resyn`** reduces the depth of Boolean networks without changing what
//! they compute. It provides two engines working on gate-inverter graphs:
//!
//! - an **algebraic rewriter** for And-Inverter Graphs (AIGs), which walks the
//!   critical paths and applies associativity and distributivity of AND where
//!   they shorten them;
//! - an **AQFP node resynthesizer**, which rebuilds a node of at most four
//!   inputs out of 3-input majority gates taken from a replacement database.
//!
//! ## Networks
//!
//! A [`Network`][crate::network::Network] is a DAG of gates of a single kind
//! ([`And`][crate::gate::And] or [`Maj`][crate::gate::Maj]) with inverters on the
//! edges. Gates are normalized and structurally hashed on creation. Levels and
//! critical paths live in a separate [`DepthView`][crate::depth::DepthView],
//! which tracks when they go stale.
//!
//! ## Basic Usage
//!
//! ```rust
//! use logic_resyn::depth::DepthView;
//! use logic_resyn::network::Aig;
//! use logic_resyn::rewrite::AlgebraicRewriter;
//!
//! // f = ((x1 · x2) · b) · c
//! let mut aig = Aig::new();
//! let x1 = aig.add_input();
//! let x2 = aig.add_input();
//! let b = aig.add_input();
//! let c = aig.add_input();
//! let a = aig.create_and(x1, x2);
//! let ab = aig.create_and(a, b);
//! let f = aig.create_and(ab, c);
//! aig.add_output(f);
//! let before = aig.output_functions();
//!
//! let mut rewriter = AlgebraicRewriter::new(&mut aig);
//! rewriter.run();
//! assert_eq!(rewriter.stats().depth_before, 3);
//! assert_eq!(rewriter.stats().depth_after, 2);
//!
//! // Same function, one level less.
//! assert_eq!(aig.output_functions(), before);
//! assert_eq!(DepthView::new(&mut aig).depth(), 2);
//! ```
//!
//! ## Core Components
//!
//! - **[`network`]**: AIGs and MIGs with structural hashing and node substitution.
//! - **[`depth`]**: levels and critical paths, with an explicit edit/commit phase.
//! - **[`rewrite`]**: the algebraic rewriter and its rules.
//! - **[`aqfp`]**: replacement databases and the AQFP node resynthesizer.

pub mod aqfp;
pub mod depth;
pub mod gate;
pub mod network;
pub mod rewrite;
pub mod signal;
pub mod truth;
