//! Many-input and many-bit versions of the two-input gates.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::design::{input, output, pin, port, Design, Element, Netlist, PortDecl};

use super::gates::{And, Bridge, Not, Or, Xor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
    Xor,
}

impl Op {
    pub fn design(self) -> Rc<dyn Design> {
        match self {
            Op::And => Rc::new(And),
            Op::Or => Rc::new(Or),
            Op::Xor => Rc::new(Xor),
        }
    }
}

/// Where a signal inside a reduction tree comes from.
enum Source {
    Port(usize),
    Gate(usize),
}

/// Folds `width` inputs into `out1` with a balanced tree of two-input gates
/// named `g1`, `g2`, ...
///
/// A single input passes through a bridge. With no inputs `out1` stays low.
#[derive(Clone, Copy, Debug)]
pub struct Reduce {
    op: Op,
    width: usize,
}

/// Where each gate input of a reduction tree is fed from, by gate number.
struct Tree {
    gates: Vec<[Source; 2]>,
    root: Option<Source>,
}

impl Reduce {
    pub fn new(op: Op, width: usize) -> Self {
        Reduce { op, width }
    }

    pub fn and(width: usize) -> Self {
        Self::new(Op::And, width)
    }

    pub fn or(width: usize) -> Self {
        Self::new(Op::Or, width)
    }

    pub fn xor(width: usize) -> Self {
        Self::new(Op::Xor, width)
    }

    fn tree(&self) -> Tree {
        let mut pending: VecDeque<Source> = (1..=self.width).map(Source::Port).collect();
        let mut gates = Vec::new();
        while pending.len() > 1 {
            if let (Some(a), Some(b)) = (pending.pop_front(), pending.pop_front()) {
                gates.push([a, b]);
                pending.push_back(Source::Gate(gates.len()));
            }
        }
        Tree {
            gates,
            root: pending.pop_front(),
        }
    }
}

impl Design for Reduce {
    fn name(&self) -> &'static str {
        match self.op {
            Op::And => "AND_TREE",
            Op::Or => "OR_TREE",
            Op::Xor => "XOR_TREE",
        }
    }

    fn elements(&self) -> Vec<Element> {
        match self.width {
            0 => vec![],
            1 => vec![Element::new(Bridge, &["g1"])],
            n => vec![Element::shared(
                self.op.design(),
                (1..n).map(|i| format!("g{i}")),
            )],
        }
    }

    fn inout(&self) -> Vec<PortDecl> {
        if self.width == 1 {
            return vec![port("in1").to("g1", "in1"), port("out1").to("g1", "out1")];
        }
        let tree = self.tree();
        let mut ports: Vec<PortDecl> = Vec::with_capacity(self.width + 1);
        for (gate, sources) in tree.gates.iter().enumerate() {
            for (slot, source) in sources.iter().enumerate() {
                if let Source::Port(i) = source {
                    ports.push(port(input(*i)).to(format!("g{}", gate + 1), input(slot + 1)));
                }
            }
        }
        ports.sort_by_key(|decl| decl.name[2..].parse::<usize>().unwrap_or(0));
        ports.push(match tree.root {
            Some(Source::Gate(root)) => port("out1").to(format!("g{root}"), "out1"),
            _ => port("out1"),
        });
        ports
    }

    fn connect(&self) -> Netlist {
        let tree = self.tree();
        let mut nets = Vec::new();
        for (gate, sources) in tree.gates.iter().enumerate() {
            for (slot, source) in sources.iter().enumerate() {
                if let Source::Gate(from) = source {
                    nets.push(vec![
                        pin(format!("g{from}"), "out1"),
                        pin(format!("g{}", gate + 1), input(slot + 1)),
                    ]);
                }
            }
        }
        nets
    }
}

/// `BITS` independent gates: `out{i} = in{i} op in{BITS + i}`.
#[derive(Clone, Copy, Debug)]
pub struct Bitwise<const BITS: usize>(pub Op);

impl<const BITS: usize> Design for Bitwise<BITS> {
    fn name(&self) -> &'static str {
        match self.0 {
            Op::And => "AND_BITWISE",
            Op::Or => "OR_BITWISE",
            Op::Xor => "XOR_BITWISE",
        }
    }

    fn elements(&self) -> Vec<Element> {
        vec![Element::shared(
            self.0.design(),
            (1..=BITS).map(|i| format!("g{i}")),
        )]
    }

    fn inout(&self) -> Vec<PortDecl> {
        let a = (1..=BITS).map(|i| port(input(i)).to(format!("g{i}"), "in1"));
        let b = (1..=BITS).map(|i| port(input(BITS + i)).to(format!("g{i}"), "in2"));
        let out = (1..=BITS).map(|i| port(output(i)).to(format!("g{i}"), "out1"));
        a.chain(b).chain(out).collect()
    }
}

/// `BITS` inverters: `out{i} = !in{i}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Invert<const BITS: usize>;

impl<const BITS: usize> Design for Invert<BITS> {
    fn name(&self) -> &'static str {
        "NOT_BITWISE"
    }

    fn elements(&self) -> Vec<Element> {
        vec![Element::numbered(Not, "n", BITS)]
    }

    fn inout(&self) -> Vec<PortDecl> {
        let ins = (1..=BITS).map(|i| port(input(i)).to(format!("n{i}"), "in1"));
        let outs = (1..=BITS).map(|i| port(output(i)).to(format!("n{i}"), "out1"));
        ins.chain(outs).collect()
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{Bitwise, Invert, Op, Reduce};
    use crate::circuit_sim::Simulation;
    use crate::components::bus::Bus;
    use crate::Options;

    fn reduce(op: Op, bits: &[bool]) -> (bool, u64) {
        let mut options = Options::new();
        for (i, bit) in bits.iter().enumerate() {
            options = options.input(format!("in{}", i + 1), *bit);
        }
        let mut sim = Simulation::build(Reduce::new(op, bits.len()), options).unwrap();
        let depth = sim.run_to_depth().unwrap();
        (sim.bit("out1").unwrap(), depth)
    }

    #[test]
    fn tree_shapes() {
        let circuit = crate::Circuit::new(Reduce::and(8), Options::new()).unwrap();
        assert_eq!(circuit.elements().count(), 7);
        // Three levels of AND gates.
        assert_eq!(circuit.depth(), Some(3));
        let names: Vec<_> = circuit.ports().iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["in1", "in2", "in3", "in4", "in5", "in6", "in7", "in8", "out1"]
        );

        let odd = crate::Circuit::new(Reduce::and(3), Options::new()).unwrap();
        assert_eq!(odd.elements().count(), 2);
        assert_eq!(odd.depth(), Some(2));
    }

    #[test]
    fn degenerate_widths() {
        assert_eq!(reduce(Op::Or, &[true]), (true, 1));
        assert_eq!(reduce(Op::And, &[false]).0, false);
        assert!(!reduce(Op::And, &[]).0);
    }

    #[test]
    fn xor_tree_is_parity() {
        assert!(reduce(Op::Xor, &[true, false, false, false]).0);
        assert!(!reduce(Op::Xor, &[true, true, false, false]).0);
        assert!(reduce(Op::Xor, &[true, true, true]).0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn reductions_match(bits in prop::collection::vec(any::<bool>(), 2..9)) {
            prop_assert_eq!(reduce(Op::And, &bits).0, bits.iter().all(|b| *b));
            prop_assert_eq!(reduce(Op::Or, &bits).0, bits.iter().any(|b| *b));
            prop_assert_eq!(reduce(Op::Xor, &bits).0, bits.iter().filter(|b| **b).count() % 2 == 1);
        }

        #[test]
        fn bitwise_bytes(a in any::<u8>(), b in any::<u8>()) {
            let (a_bus, b_bus, out) = (Bus::<8>::inputs(1), Bus::<8>::inputs(9), Bus::<8>::outputs(1));
            for (op, expected) in [(Op::And, a & b), (Op::Or, a | b), (Op::Xor, a ^ b)] {
                let options = b_bus.set(a_bus.set(Options::new(), a), b);
                let mut sim = Simulation::build(Bitwise::<8>(op), options).unwrap();
                sim.run_to_depth().unwrap();
                prop_assert_eq!(out.read::<u8>(sim.circuit()).unwrap(), expected);
            }

            let mut sim = Simulation::build(Invert::<8>, a_bus.set(Options::new(), a)).unwrap();
            sim.tick();
            prop_assert_eq!(out.read::<u8>(sim.circuit()).unwrap(), !a);
        }
    }
}
