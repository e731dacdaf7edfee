//! Circuits that count how many of their inputs are set.

use crate::design::{pin, port, Design, Element, Netlist, PortDecl};

use super::gates::{And, Bridge, Not, Or};
use super::wide::Reduce;

/// Four inputs; `out1` is set when at least two of them are.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtLeastTwo;

/// The six input pairs, as `(and gate, first input, second input)`.
const PAIRS: [(&str, usize, usize); 6] = [
    ("a1", 1, 2),
    ("a2", 1, 3),
    ("a3", 1, 4),
    ("a4", 2, 3),
    ("a5", 2, 4),
    ("a6", 3, 4),
];

impl Design for AtLeastTwo {
    fn name(&self) -> &'static str {
        "MT1"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::numbered(Bridge, "b", 4),
            Element::numbered(And, "a", 6),
            Element::new(Reduce::or(3), &["o31", "o32"]),
            Element::new(Or, &["o1"]),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        vec![
            port("in1").to("b1", "in1"),
            port("in2").to("b2", "in1"),
            port("in3").to("b3", "in1"),
            port("in4").to("b4", "in1"),
            port("out1").to("o1", "out1"),
        ]
    }

    fn connect(&self) -> Netlist {
        let mut nets: Netlist = (1..=4)
            .map(|bit| {
                let mut net = vec![pin(format!("b{bit}"), "out1")];
                for (gate, first, second) in PAIRS {
                    if first == bit {
                        net.push(pin(gate, "in1"));
                    } else if second == bit {
                        net.push(pin(gate, "in2"));
                    }
                }
                net
            })
            .collect();
        for (i, (gate, _, _)) in PAIRS.iter().enumerate() {
            let or = if i < 3 { "o31" } else { "o32" };
            nets.push(vec![pin(*gate, "out1"), pin(or, format!("in{}", i % 3 + 1))]);
        }
        nets.push(vec![pin("o31", "out1"), pin("o1", "in1")]);
        nets.push(vec![pin("o32", "out1"), pin("o1", "in2")]);
        nets
    }
}

/// Three inputs, one-hot count on four outputs: `out1` none set, `out2`
/// exactly one, `out3` exactly two, `out4` all three.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tally3;

impl Design for Tally3 {
    fn name(&self) -> &'static str {
        "SC"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::numbered(Bridge, "b", 3),
            Element::new(Reduce::or(3), &["o1", "o2"]),
            Element::new(Reduce::and(3), &["a1", "a2", "a3", "a4", "a5"]),
            Element::numbered(Not, "n", 6),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        vec![
            port("in1").to("b1", "in1"),
            port("in2").to("b2", "in1"),
            port("in3").to("b3", "in1"),
            port("out1").to("n1", "out1"),
            port("out2").to("o2", "out1"),
            port("out3").to("a5", "out1"),
            port("out4").to("a1", "out1"),
        ]
    }

    fn connect(&self) -> Netlist {
        vec![
            // a1: all set. a2..a4: only one set.
            vec![
                pin("b1", "out1"),
                pin("o1", "in1"),
                pin("a1", "in1"),
                pin("a2", "in1"),
                pin("n2", "in1"),
            ],
            vec![
                pin("b2", "out1"),
                pin("o1", "in2"),
                pin("a1", "in2"),
                pin("a3", "in1"),
                pin("n3", "in1"),
            ],
            vec![
                pin("b3", "out1"),
                pin("o1", "in3"),
                pin("a1", "in3"),
                pin("a4", "in1"),
                pin("n4", "in1"),
            ],
            vec![pin("o1", "out1"), pin("n1", "in1"), pin("a5", "in1")],
            vec![pin("n2", "out1"), pin("a3", "in2"), pin("a4", "in2")],
            vec![pin("n3", "out1"), pin("a2", "in2"), pin("a4", "in3")],
            vec![pin("n4", "out1"), pin("a3", "in3"), pin("a2", "in3")],
            vec![pin("a2", "out1"), pin("o2", "in1")],
            vec![pin("a3", "out1"), pin("o2", "in2")],
            vec![pin("a4", "out1"), pin("o2", "in3")],
            // a5: some set, not all, not exactly one.
            vec![pin("o2", "out1"), pin("n5", "in1")],
            vec![pin("a1", "out1"), pin("n6", "in1")],
            vec![pin("n6", "out1"), pin("a5", "in2")],
            vec![pin("n5", "out1"), pin("a5", "in3")],
        ]
    }
}
