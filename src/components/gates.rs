//! Primitive gates and the two-input gates built from them.

use crate::circuit::Ports;
use crate::design::{pin, port, Design, Element, Netlist, PortDecl};

macro_rules! leaf_gen {
    ( $gate:ident, $name:literal, [ $( $input:literal ),+ ], | $( $val:ident ),+ | $body:expr ) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $gate;

        impl Design for $gate {
            fn name(&self) -> &'static str {
                $name
            }

            fn inout(&self) -> Vec<PortDecl> {
                vec![$( port($input), )+ port("out1")]
            }

            fn evaluate(&self, ports: &Ports) {
                let [$( $val ),+] = [$( ports[$input].get() ),+];
                ports["out1"].set($body);
            }
        }
    };
}

leaf_gen!(Bridge, "BRIDGE", ["in1"], |a| a);
leaf_gen!(Not, "NOT", ["in1"], |a| !a);
leaf_gen!(And, "AND", ["in1", "in2"], |a, b| a && b);
leaf_gen!(Or, "OR", ["in1", "in2"], |a, b| a || b);

/// A two-input gate followed by an inverter.
fn inverted(gate: &str) -> Vec<PortDecl> {
    vec![
        port("in1").to(gate, "in1"),
        port("in2").to(gate, "in2"),
        port("out1").to("n1", "out1"),
    ]
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Nand;

impl Design for Nand {
    fn name(&self) -> &'static str {
        "NAND"
    }

    fn elements(&self) -> Vec<Element> {
        vec![Element::new(And, &["a1"]), Element::new(Not, &["n1"])]
    }

    fn inout(&self) -> Vec<PortDecl> {
        inverted("a1")
    }

    fn connect(&self) -> Netlist {
        vec![vec![pin("a1", "out1"), pin("n1", "in1")]]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Nor;

impl Design for Nor {
    fn name(&self) -> &'static str {
        "NOR"
    }

    fn elements(&self) -> Vec<Element> {
        vec![Element::new(Or, &["o1"]), Element::new(Not, &["n1"])]
    }

    fn inout(&self) -> Vec<PortDecl> {
        inverted("o1")
    }

    fn connect(&self) -> Netlist {
        vec![vec![pin("o1", "out1"), pin("n1", "in1")]]
    }
}

/// `(a | b) & !(a & b)`. Inputs fan out through bridges.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xor;

impl Design for Xor {
    fn name(&self) -> &'static str {
        "XOR"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::new(And, &["a1"]),
            Element::new(Or, &["o1"]),
            Element::new(Nand, &["n1"]),
            Element::new(Bridge, &["b1", "b2"]),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        vec![
            port("in1").to("b1", "in1"),
            port("in2").to("b2", "in1"),
            port("out1").to("a1", "out1"),
        ]
    }

    fn connect(&self) -> Netlist {
        vec![
            vec![pin("b1", "out1"), pin("o1", "in1"), pin("n1", "in1")],
            vec![pin("b2", "out1"), pin("o1", "in2"), pin("n1", "in2")],
            vec![pin("o1", "out1"), pin("a1", "in1")],
            vec![pin("n1", "out1"), pin("a1", "in2")],
        ]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Xnor;

impl Design for Xnor {
    fn name(&self) -> &'static str {
        "XNOR"
    }

    fn elements(&self) -> Vec<Element> {
        vec![Element::new(Xor, &["x1"]), Element::new(Not, &["n1"])]
    }

    fn inout(&self) -> Vec<PortDecl> {
        inverted("x1")
    }

    fn connect(&self) -> Netlist {
        vec![vec![pin("x1", "out1"), pin("n1", "in1")]]
    }
}
