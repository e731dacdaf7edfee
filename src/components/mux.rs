use crate::design::{pin, port, Design, Element, Netlist, PortDecl};

use super::gates::{And, Bridge, Not, Or};

/// `out1 = in3 ? in2 : in1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mux2;

impl Design for Mux2 {
    fn name(&self) -> &'static str {
        "MUX2"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::new(Bridge, &["s1"]),
            Element::new(Not, &["n1"]),
            Element::new(And, &["a1", "a2"]),
            Element::new(Or, &["o1"]),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        vec![
            port("in1").to("a1", "in1"),
            port("in2").to("a2", "in1"),
            port("in3").to("s1", "in1"),
            port("out1").to("o1", "out1"),
        ]
    }

    fn connect(&self) -> Netlist {
        vec![
            vec![pin("s1", "out1"), pin("n1", "in1"), pin("a2", "in2")],
            vec![pin("n1", "out1"), pin("a1", "in2")],
            vec![pin("a1", "out1"), pin("o1", "in1")],
            vec![pin("a2", "out1"), pin("o1", "in2")],
        ]
    }
}
