//! Comparators over two unsigned `BITS`-bit operands.
//!
//! Every multi-bit comparator takes `a` on `in1..=inBITS` and `b` on
//! `in(BITS+1)..=in(2*BITS)`, least significant bit first, and answers on
//! `out1`.

use std::rc::Rc;

use crate::design::{input, pin, port, Design, Element, Netlist, Pin, PortDecl};

use super::gates::{And, Bridge, Not, Or, Xnor};
use super::wide::Reduce;

/// `a & !b` for single bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gt;

impl Design for Gt {
    fn name(&self) -> &'static str {
        "GT"
    }

    fn elements(&self) -> Vec<Element> {
        vec![Element::new(And, &["a1"]), Element::new(Not, &["n1"])]
    }

    fn inout(&self) -> Vec<PortDecl> {
        vec![
            port("in1").to("a1", "in1"),
            port("in2").to("n1", "in1"),
            port("out1").to("a1", "out1"),
        ]
    }

    fn connect(&self) -> Netlist {
        vec![vec![pin("n1", "out1"), pin("a1", "in2")]]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Equal<const BITS: usize>;

impl<const BITS: usize> Design for Equal<BITS> {
    fn name(&self) -> &'static str {
        "EQ"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::numbered(Xnor, "x", BITS),
            Element::new(Reduce::and(BITS), &["r1"]),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        let mut ports: Vec<PortDecl> = (1..=BITS)
            .map(|i| port(input(i)).to(format!("x{i}"), "in1"))
            .collect();
        ports.extend((1..=BITS).map(|i| port(input(BITS + i)).to(format!("x{i}"), "in2")));
        ports.push(port("out1").to("r1", "out1"));
        ports
    }

    fn connect(&self) -> Netlist {
        (1..=BITS)
            .map(|i| vec![pin(format!("x{i}"), "out1"), pin("r1", input(i))])
            .collect()
    }
}

/// Bridges `ba{i}` and `bb{i}` fan each operand bit out.
fn operand_bridges(bits: usize) -> Vec<Element> {
    vec![
        Element::numbered(Bridge, "ba", bits),
        Element::numbered(Bridge, "bb", bits),
    ]
}

fn operand_ports(bits: usize) -> Vec<PortDecl> {
    let a = (1..=bits).map(|i| port(input(i)).to(format!("ba{i}"), "in1"));
    let b = (1..=bits).map(|i| port(input(bits + i)).to(format!("bb{i}"), "in1"));
    a.chain(b).collect()
}

/// `a > b`: some bit has `a & !b` while every higher bit is equal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Greater<const BITS: usize>;

impl<const BITS: usize> Design for Greater<BITS> {
    fn name(&self) -> &'static str {
        "GT_WIDE"
    }

    fn elements(&self) -> Vec<Element> {
        let mut elements = operand_bridges(BITS);
        elements.push(Element::numbered(Gt, "g", BITS));
        elements.push(Element::shared(
            Rc::new(Xnor),
            (2..=BITS).map(|i| format!("e{i}")),
        ));
        for i in 1..BITS {
            elements.push(Element::shared(
                Rc::new(Reduce::and(BITS - i + 1)),
                [format!("t{i}")],
            ));
        }
        elements.push(Element::new(Reduce::or(BITS), &["o1"]));
        elements
    }

    fn inout(&self) -> Vec<PortDecl> {
        let mut ports = operand_ports(BITS);
        ports.push(port("out1").to("o1", "out1"));
        ports
    }

    fn connect(&self) -> Netlist {
        let mut nets = Vec::new();
        for i in 1..=BITS {
            for (bridge, slot) in [("ba", "in1"), ("bb", "in2")] {
                let mut net = vec![pin(format!("{bridge}{i}"), "out1"), pin(format!("g{i}"), slot)];
                if i >= 2 {
                    net.push(pin(format!("e{i}"), slot));
                }
                nets.push(net);
            }
        }
        for i in 1..BITS {
            nets.push(vec![pin(format!("g{i}"), "out1"), pin(format!("t{i}"), "in1")]);
            nets.push(vec![pin(format!("t{i}"), "out1"), pin("o1", input(i))]);
        }
        nets.push(vec![pin(format!("g{BITS}"), "out1"), pin("o1", input(BITS))]);
        for j in 2..=BITS {
            let mut net: Vec<Pin> = vec![pin(format!("e{j}"), "out1")];
            net.extend((1..j).map(|i| pin(format!("t{i}"), input(j - i + 1))));
            nets.push(net);
        }
        nets
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GreaterOrEqual<const BITS: usize>;

impl<const BITS: usize> Design for GreaterOrEqual<BITS> {
    fn name(&self) -> &'static str {
        "GTE"
    }

    fn elements(&self) -> Vec<Element> {
        let mut elements = operand_bridges(BITS);
        elements.push(Element::new(Greater::<BITS>, &["g1"]));
        elements.push(Element::new(Equal::<BITS>, &["e1"]));
        elements.push(Element::new(Or, &["o1"]));
        elements
    }

    fn inout(&self) -> Vec<PortDecl> {
        let mut ports = operand_ports(BITS);
        ports.push(port("out1").to("o1", "out1"));
        ports
    }

    fn connect(&self) -> Netlist {
        let mut nets = Vec::new();
        for i in 1..=BITS {
            nets.push(vec![
                pin(format!("ba{i}"), "out1"),
                pin("g1", input(i)),
                pin("e1", input(i)),
            ]);
            nets.push(vec![
                pin(format!("bb{i}"), "out1"),
                pin("g1", input(BITS + i)),
                pin("e1", input(BITS + i)),
            ]);
        }
        nets.push(vec![pin("g1", "out1"), pin("o1", "in1")]);
        nets.push(vec![pin("e1", "out1"), pin("o1", "in2")]);
        nets
    }
}

/// Inverts the answer of a comparator `c1`.
fn negated(comparator: Rc<dyn Design>) -> Vec<Element> {
    vec![
        Element::shared(comparator, ["c1".to_string()]),
        Element::new(Not, &["n1"]),
    ]
}

fn negated_inout(bits: usize) -> Vec<PortDecl> {
    let mut ports: Vec<PortDecl> = (1..=2 * bits)
        .map(|i| port(input(i)).to("c1", input(i)))
        .collect();
    ports.push(port("out1").to("n1", "out1"));
    ports
}

fn negated_connect() -> Netlist {
    vec![vec![pin("c1", "out1"), pin("n1", "in1")]]
}

macro_rules! negated_gen {
    ( $comparator:ident, $inner:ident, $name:literal ) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $comparator<const BITS: usize>;

        impl<const BITS: usize> Design for $comparator<BITS> {
            fn name(&self) -> &'static str {
                $name
            }

            fn elements(&self) -> Vec<Element> {
                negated(Rc::new($inner::<BITS>))
            }

            fn inout(&self) -> Vec<PortDecl> {
                negated_inout(BITS)
            }

            fn connect(&self) -> Netlist {
                negated_connect()
            }
        }
    };
}

negated_gen!(NotEqual, Equal, "NEQ");
negated_gen!(Less, GreaterOrEqual, "LT");
negated_gen!(LessOrEqual, Greater, "LTE");

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::circuit_sim::Simulation;
    use crate::components::bus::Bus;
    use crate::Options;

    fn compare<D: Design + 'static>(design: D, a: u8, b: u8) -> bool {
        let options = Bus::<8>::inputs(9).set(Bus::<8>::inputs(1).set(Options::new(), a), b);
        let mut sim = Simulation::build(design, options).unwrap();
        sim.run_to_depth().unwrap();
        sim.bit("out1").unwrap()
    }

    #[test]
    fn single_bit_gt() {
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let options = Options::new().input("in1", a).input("in2", b);
            let mut sim = Simulation::build(Gt, options).unwrap();
            sim.run(2);
            assert_eq!(sim.bit("out1"), Some(a && !b), "{a} > {b}");
        }
    }

    #[test]
    fn boundaries() {
        assert!(compare(Greater::<8>, 128, 127));
        assert!(!compare(Greater::<8>, 127, 128));
        assert!(!compare(Greater::<8>, 0, 0));
        assert!(compare(Greater::<8>, 255, 0));
        assert!(compare(GreaterOrEqual::<8>, 5, 5));
        assert!(compare(Equal::<8>, 255, 255));
        assert!(!compare(NotEqual::<8>, 42, 42));
        assert!(compare(Less::<8>, 1, 2));
        assert!(compare(LessOrEqual::<8>, 2, 2));
        assert!(!compare(LessOrEqual::<8>, 3, 2));
    }

    #[test]
    fn narrow_greater() {
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let options = Options::new().input("in1", a).input("in2", b);
            let mut sim = Simulation::build(Greater::<1>, options).unwrap();
            sim.run_to_depth().unwrap();
            assert_eq!(sim.bit("out1"), Some(a && !b));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn comparators_match(a in any::<u8>(), b in any::<u8>()) {
            prop_assert_eq!(compare(Equal::<8>, a, b), a == b);
            prop_assert_eq!(compare(NotEqual::<8>, a, b), a != b);
            prop_assert_eq!(compare(Greater::<8>, a, b), a > b);
            prop_assert_eq!(compare(GreaterOrEqual::<8>, a, b), a >= b);
            prop_assert_eq!(compare(Less::<8>, a, b), a < b);
            prop_assert_eq!(compare(LessOrEqual::<8>, a, b), a <= b);
        }
    }
}
