//! Properties of the rewriter and the resynthesizer on random networks.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use test_log::test;

use logic_resyn::aqfp::{
    AqfpDb, AqfpNodeResyn, AqfpResynParams, AqfpResynStrategy, Leaf, Replacement,
};
use logic_resyn::depth::DepthView;
use logic_resyn::network::{Aig, Mig};
use logic_resyn::rewrite::AlgebraicRewriter;
use logic_resyn::signal::{NodeId, Signal};
use logic_resyn::truth::TruthTable;

const NUM_INPUTS: usize = 6;

/// Random AIG whose gates mostly pick recent fan-ins, which makes for deep,
/// unbalanced chains.
fn random_aig(rng: &mut ChaCha8Rng, num_gates: usize, num_outputs: usize) -> Aig {
    let mut aig = Aig::new();
    let mut signals: Vec<Signal> = (0..NUM_INPUTS).map(|_| aig.add_input()).collect();
    for _ in 0..num_gates {
        let pick = |rng: &mut ChaCha8Rng| {
            let recent = signals.len().min(4);
            let index = if rng.gen_bool(0.5) {
                signals.len() - 1 - rng.gen_range(0..recent)
            } else {
                rng.gen_range(0..signals.len())
            };
            signals[index].complement_if(rng.gen_bool(0.5))
        };
        let a = pick(&mut *rng);
        let b = pick(&mut *rng);
        let g = aig.create_and(a, b);
        if !g.is_const() && !signals.contains(&g.regular()) {
            signals.push(g.regular());
        }
    }
    for i in 0..num_outputs {
        let s = signals[signals.len() - 1 - i % signals.len()];
        aig.add_output(s.complement_if(rng.gen_bool(0.5)));
    }
    aig
}

fn depth(aig: &mut Aig) -> u32 {
    DepthView::new(aig).depth()
}

fn check_well_formed(aig: &Aig) {
    for &output in aig.outputs() {
        assert!(!aig.is_dead(output.node()), "output {} is dead", output);
    }
    for node in aig.gates() {
        for fanin in aig.fanins(node) {
            assert!(!aig.is_dead(fanin.node()), "n{} has dead fan-in {}", node, fanin);
        }
    }
}

#[test]
fn test_rewriting_preserves_function() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut total_rewrites = 0;
    for _ in 0..200 {
        let num_gates = rng.gen_range(5..60);
        let mut aig = random_aig(&mut rng, num_gates, 3);
        let before = aig.output_functions();
        let depth_before = depth(&mut aig);

        let stats = {
            let mut rewriter = AlgebraicRewriter::new(&mut aig);
            rewriter.run();
            rewriter.stats().clone()
        };
        total_rewrites += stats.total();

        check_well_formed(&aig);
        assert_eq!(aig.output_functions(), before);
        assert_eq!(stats.depth_before, depth_before);
        assert!(stats.depth_after <= stats.depth_before);
        assert_eq!(depth(&mut aig), stats.depth_after);
    }
    // The generator produces enough critical chains for rules to fire.
    assert!(total_rewrites > 0);
}

#[test]
fn test_rewriting_is_idempotent() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..100 {
        let num_gates = rng.gen_range(5..60);
        let mut aig = random_aig(&mut rng, num_gates, 2);
        AlgebraicRewriter::new(&mut aig).run();
        let gates: Vec<NodeId> = aig.gates().collect();
        let outputs = aig.outputs().to_vec();

        let mut rewriter = AlgebraicRewriter::new(&mut aig);
        rewriter.run();
        assert_eq!(rewriter.stats().total(), 0);
        assert_eq!(rewriter.stats().passes, 1);
        drop(rewriter);

        assert_eq!(aig.gates().collect::<Vec<_>>(), gates);
        assert_eq!(aig.outputs(), outputs.as_slice());
    }
}

/// `function` applied to the leaf functions.
fn compose(function: u16, leaves: &[TruthTable; 4]) -> TruthTable {
    let num_vars = leaves[0].num_vars();
    let mut result = TruthTable::new(num_vars);
    for minterm in 0..16 {
        if function >> minterm & 1 == 0 {
            continue;
        }
        let mut cube = !TruthTable::new(num_vars);
        for (i, &leaf) in leaves.iter().enumerate() {
            cube = cube & if minterm >> i & 1 == 1 { leaf } else { !leaf };
        }
        result = result | cube;
    }
    result
}

fn replacement_db() -> AqfpDb {
    const ZERO: u32 = 0;
    const ONE: u32 = 1;
    let x = |i: u32| i << 1;
    let mut db = AqfpDb::new(6.0);
    // AND, OR, MAJ of three, and their complements.
    db.add(0x8888, Replacement::from_gates(vec![[ZERO, x(1), x(2)]], false));
    db.add(0x7777, Replacement::from_gates(vec![[ZERO, x(1), x(2)]], true));
    db.add(0xeeee, Replacement::from_gates(vec![[ONE, x(1), x(2)]], false));
    db.add(0xe8e8, Replacement::from_gates(vec![[x(1), x(2), x(3)]], false));
    db.add(0x1717, Replacement::from_gates(vec![[x(1), x(2), x(3)]], true));
    // XOR, two ways.
    db.add(
        0x6666,
        Replacement::from_gates(
            vec![[ZERO, x(1), x(2)], [ONE, x(1), x(2)], [ZERO, x(6), x(5) | 1]],
            false,
        ),
    );
    db.add(
        0x6666,
        Replacement::from_gates(
            vec![[ZERO, x(1), x(2) | 1], [ZERO, x(1) | 1, x(2)], [ONE, x(5), x(6)]],
            false,
        ),
    );
    // AND of four, balanced and as a chain.
    db.add(
        0x8000,
        Replacement::from_gates(
            vec![[ZERO, x(1), x(2)], [ZERO, x(3), x(4)], [ZERO, x(5), x(6)]],
            false,
        ),
    );
    db.add(
        0x8000,
        Replacement::from_gates(
            vec![[ZERO, x(1), x(2)], [ZERO, x(5), x(3)], [ZERO, x(6), x(4)]],
            false,
        ),
    );
    db
}

#[test]
fn test_resynthesis_correct_and_levels_consistent() {
    let db = replacement_db();
    let functions = [
        0x0000, 0xffff, 0x5555, 0xaaaa, 0x3333, 0xcccc, 0x0f0f, 0xf0f0, 0x00ff, 0xff00, 0x8888,
        0x7777, 0xeeee, 0xe8e8, 0x1717, 0x6666, 0x8000,
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for strategy in [AqfpResynStrategy::CostBased, AqfpResynStrategy::LevelBased] {
        let params = AqfpResynParams {
            strategy,
            splitters: [(2, 2.0), (4, 4.0)].into_iter().collect(),
            branch_pis: rng.gen_bool(0.5),
        };
        let resyn = AqfpNodeResyn::new(&db, params);

        for &function in &functions {
            // Leaves: random majority gates over the inputs, at known levels.
            let mut mig = Mig::new();
            let inputs: Vec<Signal> = (0..NUM_INPUTS).map(|_| mig.add_input()).collect();
            let mut levels = vec![0u32; NUM_INPUTS + 1];
            let mut leaves = Vec::new();
            for _ in 0..4 {
                let leaf = if rng.gen_bool(0.3) {
                    Leaf::new(*inputs.choose(&mut rng).unwrap(), 0)
                } else {
                    let [a, b, c] = [0; 3].map(|_| {
                        let input = *inputs.choose(&mut rng).unwrap();
                        input.complement_if(rng.gen_bool(0.5))
                    });
                    let s = mig.create_maj(a, b, c);
                    let level = if mig.is_gate(s.node()) { 1 } else { 0 };
                    Leaf::new(s, level)
                };
                leaves.push(leaf);
            }
            for leaf in &leaves {
                let node = leaf.signal.node() as usize;
                if node >= levels.len() {
                    levels.resize(node + 1, 0);
                }
                levels[node] = leaf.level;
            }

            let mut reported = Vec::new();
            let mut output = None;
            resyn.resynthesize(
                &mut mig,
                &TruthTable::from_bits(4, function as u64),
                &leaves,
                |node, level| reported.push((node, level)),
                |signal, level| output = Some((signal, level)),
            );
            let (signal, level) = output.expect("result callback not invoked");

            for &(node, level) in &reported {
                let node = node as usize;
                if node >= levels.len() {
                    levels.resize(node + 1, 0);
                }
                if mig.is_gate(node as NodeId) {
                    for fanin in mig.fanins(node as NodeId) {
                        assert!(level >= levels[fanin.node() as usize] + 1);
                    }
                }
                levels[node] = level;
            }
            if !signal.is_const() {
                assert_eq!(level, levels[signal.node() as usize]);
            }

            for leaf in &leaves {
                mig.add_output(leaf.signal);
            }
            mig.add_output(signal);
            let outputs = mig.output_functions();
            let leaf_functions = [outputs[0], outputs[1], outputs[2], outputs[3]];
            assert_eq!(
                outputs[4],
                compose(function, &leaf_functions),
                "function 0x{:04x} with {:?}",
                function,
                strategy
            );
        }
    }
}
