use crate::design::{input, output, pin, port, Design, Element, Netlist, PortDecl};

use super::gates::{And, Bridge, Or, Xor};

/// `out1 = a ^ b`, `out2 = a & b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HalfAdder;

impl Design for HalfAdder {
    fn name(&self) -> &'static str {
        "HADD"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::new(Xor, &["x1"]),
            Element::new(And, &["a1"]),
            Element::new(Bridge, &["b1", "b2"]),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        vec![
            port("in1").to("b1", "in1"),
            port("in2").to("b2", "in1"),
            port("out1").to("x1", "out1"),
            port("out2").to("a1", "out1"),
        ]
    }

    fn connect(&self) -> Netlist {
        vec![
            vec![pin("b1", "out1"), pin("x1", "in1"), pin("a1", "in1")],
            vec![pin("b2", "out1"), pin("x1", "in2"), pin("a1", "in2")],
        ]
    }
}

/// `in3` is the carry in; `out1` is the sum and `out2` the carry out.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullAdder;

impl Design for FullAdder {
    fn name(&self) -> &'static str {
        "ADD"
    }

    fn elements(&self) -> Vec<Element> {
        vec![
            Element::new(HalfAdder, &["h1", "h2"]),
            Element::new(Or, &["o1"]),
        ]
    }

    fn inout(&self) -> Vec<PortDecl> {
        vec![
            port("in1").to("h1", "in1"),
            port("in2").to("h1", "in2"),
            port("in3").to("h2", "in2"),
            port("out1").to("h2", "out1"),
            port("out2").to("o1", "out1"),
        ]
    }

    fn connect(&self) -> Netlist {
        vec![
            vec![pin("h1", "out1"), pin("h2", "in1")],
            vec![pin("h1", "out2"), pin("o1", "in1")],
            vec![pin("h2", "out2"), pin("o1", "in2")],
        ]
    }
}

/// Adds two `BITS`-bit operands.
///
/// Ports, least significant bit first: `in1..=inBITS` is `a`,
/// `in(BITS+1)..=in(2*BITS)` is `b`, `in(2*BITS+1)` is the carry in.
/// `out1..=outBITS` is the sum and `out(BITS+1)` the carry out.
#[derive(Clone, Copy, Debug, Default)]
pub struct RippleAdder<const BITS: usize>;

impl<const BITS: usize> RippleAdder<BITS> {
    pub const CARRY_IN: usize = 2 * BITS + 1;
    pub const CARRY_OUT: usize = BITS + 1;
}

impl<const BITS: usize> Design for RippleAdder<BITS> {
    fn name(&self) -> &'static str {
        "ADD_RIPPLE"
    }

    fn elements(&self) -> Vec<Element> {
        vec![Element::numbered(FullAdder, "f", BITS)]
    }

    fn inout(&self) -> Vec<PortDecl> {
        let mut ports = Vec::with_capacity(3 * BITS + 2);
        ports.extend((1..=BITS).map(|i| port(input(i)).to(format!("f{i}"), "in1")));
        ports.extend((1..=BITS).map(|i| port(input(BITS + i)).to(format!("f{i}"), "in2")));
        ports.push(port(input(Self::CARRY_IN)).to("f1", "in3"));
        ports.extend((1..=BITS).map(|i| port(output(i)).to(format!("f{i}"), "out1")));
        ports.push(port(output(Self::CARRY_OUT)).to(format!("f{BITS}"), "out2"));
        ports
    }

    fn connect(&self) -> Netlist {
        (1..BITS)
            .map(|i| vec![pin(format!("f{i}"), "out2"), pin(format!("f{}", i + 1), "in3")])
            .collect()
    }
}

#[cfg(test)]
mod test {
    use rand::{RngCore, SeedableRng};

    use super::{FullAdder, HalfAdder, RippleAdder};
    use crate::circuit_sim::Simulation;
    use crate::components::bus::Bus;
    use crate::Options;

    fn test_adder(a: bool, b: bool, cin: bool) {
        let options = Options::new()
            .input("in1", a)
            .input("in2", b)
            .input("in3", cin);
        let mut sim = Simulation::build(FullAdder, options).unwrap();
        sim.run_to_depth().unwrap();
        assert_eq!(sim.bit("out1"), Some(a ^ b ^ cin));
        assert_eq!(
            sim.bit("out2"),
            Some((a && b) || (a && cin) || (b && cin))
        );
    }

    #[test]
    fn adder_tests() {
        test_adder(false, false, false);
        test_adder(true, false, false);
        test_adder(false, true, false);
        test_adder(true, true, false);
        test_adder(false, false, true);
        test_adder(true, false, true);
        test_adder(false, true, true);
        test_adder(true, true, true);
    }

    #[test]
    fn half_adder() {
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let options = Options::new().input("in1", a).input("in2", b);
            let mut sim = Simulation::build(HalfAdder, options).unwrap();
            sim.run_to_depth().unwrap();
            assert_eq!(sim.bit("out1"), Some(a ^ b));
            assert_eq!(sim.bit("out2"), Some(a && b));
        }
    }

    fn test_rca_add<const BITS: usize>(a: u64, b: u64, cin: bool) {
        let overflow = 1 << BITS;
        assert!(a < overflow && b < overflow);

        let options = Bus::<BITS>::inputs(BITS + 1).set(Bus::<BITS>::inputs(1).set(Options::new(), a), b);
        let options = options.input(format!("in{}", RippleAdder::<BITS>::CARRY_IN), cin);
        let mut sim = Simulation::build(RippleAdder::<BITS>, options).unwrap();
        sim.run_to_depth().unwrap();

        let expected_sum = a + b + cin as u64;
        let (expected_sum, expected_cout) = if expected_sum < overflow {
            (expected_sum, false)
        } else {
            (expected_sum - overflow, true)
        };

        let sum: u64 = Bus::<BITS>::outputs(1).read(sim.circuit()).unwrap();
        let cout = sim
            .bit(&format!("out{}", RippleAdder::<BITS>::CARRY_OUT))
            .unwrap();

        assert_eq!(sum, expected_sum, "{a} + {b} = {expected_sum}");
        assert_eq!(
            cout, expected_cout,
            "{a} + {b} with {BITS} bits has cout: {expected_cout}"
        );
    }

    #[test]
    fn rca_tests() {
        test_rca_add::<8>(0, 0, false);
        test_rca_add::<8>(255, 1, false);
        test_rca_add::<8>(255, 255, true);
        test_rca_add::<4>(7, 8, true);
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let a = rng.next_u32() as u8;
            let b = rng.next_u32() as u8;
            test_rca_add::<8>(a as u64, b as u64, false);
        }
    }
}
