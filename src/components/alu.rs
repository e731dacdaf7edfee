use crate::design::{input, output, pin, port, Design, Element, Netlist, PortDecl};

use super::adder::RippleAdder;
use super::gates::{Bridge, Not, Xor};
use super::mux::Mux2;
use super::wide::{Bitwise, Op, Reduce};

/// Adds, subtracts, ands or ors two `BITS`-bit operands.
///
/// Inputs, least significant bit first: `a` on `in1..=inBITS`, `b` on
/// `in(BITS+1)..=in(2*BITS)`, then the two opcode bits:
///
/// | `op1` | `op0` | result  |
/// |-------|-------|---------|
/// | 0     | 0     | `a + b` |
/// | 0     | 1     | `a - b` |
/// | 1     | 0     | `a & b` |
/// | 1     | 1     | `a \| b` |
///
/// `out1..=outBITS` is the result, `out(BITS+1)` the adder's carry out (set
/// on subtraction when no borrow happened) and `out(BITS+2)` is set when the
/// result is zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct Alu<const BITS: usize>;

impl<const BITS: usize> Alu<BITS> {
    pub const OP0: usize = 2 * BITS + 1;
    pub const OP1: usize = 2 * BITS + 2;
    pub const CARRY: usize = BITS + 1;
    pub const ZERO: usize = BITS + 2;
}

impl<const BITS: usize> Design for Alu<BITS> {
    fn name(&self) -> &'static str {
        "ALU"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::numbered(Bridge, "ba", BITS),
            Element::numbered(Bridge, "bb", BITS),
            Element::new(Bridge, &["bop0", "bop1"]),
            Element::numbered(Xor, "x", BITS),
            Element::new(RippleAdder::<BITS>, &["add"]),
            Element::new(Bitwise::<BITS>(Op::And), &["and"]),
            Element::new(Bitwise::<BITS>(Op::Or), &["or"]),
            Element::numbered(Mux2, "lm", BITS),
            Element::numbered(Mux2, "rm", BITS),
            Element::new(Reduce::or(BITS), &["zt"]),
            Element::new(Not, &["zn"]),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        let mut ports = Vec::with_capacity(3 * BITS + 4);
        ports.extend((1..=BITS).map(|i| port(input(i)).to(format!("ba{i}"), "in1")));
        ports.extend((1..=BITS).map(|i| port(input(BITS + i)).to(format!("bb{i}"), "in1")));
        ports.push(port(input(Self::OP0)).to("bop0", "in1"));
        ports.push(port(input(Self::OP1)).to("bop1", "in1"));
        ports.extend((1..=BITS).map(|i| port(output(i)).to(format!("rm{i}"), "out1")));
        ports.push(port(output(Self::CARRY)).to("add", output(RippleAdder::<BITS>::CARRY_OUT)));
        ports.push(port(output(Self::ZERO)).to("zn", "out1"));
        ports
    }

    fn connect(&self) -> Netlist {
        let mut nets = Vec::new();
        for i in 1..=BITS {
            nets.push(vec![
                pin(format!("ba{i}"), "out1"),
                pin("add", input(i)),
                pin("and", input(i)),
                pin("or", input(i)),
            ]);
            nets.push(vec![
                pin(format!("bb{i}"), "out1"),
                pin(format!("x{i}"), "in1"),
                pin("and", input(BITS + i)),
                pin("or", input(BITS + i)),
            ]);
            // Subtraction adds the complement of `b` plus one.
            nets.push(vec![pin(format!("x{i}"), "out1"), pin("add", input(BITS + i))]);
            nets.push(vec![pin("and", output(i)), pin(format!("lm{i}"), "in1")]);
            nets.push(vec![pin("or", output(i)), pin(format!("lm{i}"), "in2")]);
            nets.push(vec![pin("add", output(i)), pin(format!("rm{i}"), "in1")]);
            nets.push(vec![pin(format!("lm{i}"), "out1"), pin(format!("rm{i}"), "in2")]);
            nets.push(vec![pin(format!("rm{i}"), "out1"), pin("zt", input(i))]);
        }

        let mut op0 = vec![
            pin("bop0", "out1"),
            pin("add", input(RippleAdder::<BITS>::CARRY_IN)),
        ];
        op0.extend((1..=BITS).map(|i| pin(format!("x{i}"), "in2")));
        op0.extend((1..=BITS).map(|i| pin(format!("lm{i}"), "in3")));
        nets.push(op0);

        let mut op1 = vec![pin("bop1", "out1")];
        op1.extend((1..=BITS).map(|i| pin(format!("rm{i}"), "in3")));
        nets.push(op1);

        nets.push(vec![pin("zt", "out1"), pin("zn", "in1")]);
        nets
    }
}
