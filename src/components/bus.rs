use std::ops::{BitAnd, Shl};

use num_traits::Unsigned;

use crate::design::{input, output};
use crate::error::{CircuitError, Result};
use crate::{Circuit, Options};

/// A run of `BITS` consecutive ports, least significant bit first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bus<const BITS: usize>([String; BITS]);

impl<const BITS: usize> Bus<BITS> {
    /// `in{first}` up to `in{first + BITS - 1}`.
    pub fn inputs(first: usize) -> Self {
        Bus(std::array::from_fn(|bit| input(first + bit)))
    }

    /// `out{first}` up to `out{first + BITS - 1}`.
    pub fn outputs(first: usize) -> Self {
        Bus(std::array::from_fn(|bit| output(first + bit)))
    }

    pub fn ports(&self) -> &[String; BITS] {
        &self.0
    }

    pub fn read<T>(&self, circuit: &Circuit) -> Result<T>
    where
        T: Unsigned + Shl<usize, Output = T>,
    {
        let mut sum = T::zero();
        for (bit, port) in self.0.iter().enumerate() {
            let active = circuit
                .bit(port)
                .ok_or_else(|| CircuitError::UnknownPort {
                    circuit: circuit.name(),
                    target: circuit.name().to_string(),
                    port: port.clone(),
                })?;
            if active {
                sum = sum + (T::one() << bit);
            }
        }
        Ok(sum)
    }

    /// Adds a forced constant for every port of the bus.
    pub fn set<T>(&self, mut options: Options, val: T) -> Options
    where
        T: Unsigned + Copy + BitAnd<T, Output = T> + Shl<usize, Output = T>,
    {
        for (bit, port) in self.0.iter().enumerate() {
            let bit_val = !(val & (T::one() << bit)).is_zero();
            options = options.input(port.clone(), bit_val);
        }
        options
    }
}

pub trait Signed<T> {
    fn read_signed(&self, circuit: &Circuit) -> Result<T>;
    fn set_signed(&self, options: Options, val: T) -> Options;
}

macro_rules! read_signed {
    ( $bits:expr, $i:ty, $u:ty ) => {
        impl Signed<$i> for Bus<$bits> {
            fn read_signed(&self, circuit: &Circuit) -> Result<$i> {
                Ok(self.read::<$u>(circuit)? as $i)
            }

            fn set_signed(&self, options: Options, val: $i) -> Options {
                self.set(options, val as $u)
            }
        }
    };
}

read_signed!(8, i8, u8);
read_signed!(16, i16, u16);
read_signed!(32, i32, u32);
read_signed!(64, i64, u64);

#[cfg(test)]
mod test {
    use super::{Bus, Signed};
    use crate::components::wide::Invert;
    use crate::{Circuit, CircuitError, Forced, Options};

    #[test]
    fn port_names() {
        let bus = Bus::<3>::inputs(9);
        assert_eq!(bus.ports(), &["in9", "in10", "in11"]);
        assert_eq!(Bus::<2>::outputs(1).ports(), &["out1", "out2"]);
    }

    #[test]
    fn set_forces_each_bit() {
        let options = Bus::<4>::inputs(1).set(Options::new(), 0b1010u8);
        let bits: Vec<_> = ["in1", "in2", "in3", "in4"]
            .iter()
            .map(|port| match options.get(port) {
                Some(Forced::Constant(val)) => *val,
                other => panic!("{port}: {other:?}"),
            })
            .collect();
        assert_eq!(bits, [false, true, false, true]);
    }

    #[test]
    fn read_through_inverters() {
        let circuit = Circuit::new(Invert::<8>, Bus::<8>::inputs(1).set(Options::new(), 0x0fu8)).unwrap();
        circuit.update();
        assert_eq!(Bus::<8>::outputs(1).read::<u8>(&circuit).unwrap(), 0xf0);
        assert_eq!(Bus::<8>::outputs(1).read_signed(&circuit).unwrap(), -16i8);
        assert_eq!(Bus::<4>::inputs(1).read::<u32>(&circuit).unwrap(), 0xf);
    }

    #[test]
    fn signed_round_trip_through_options() {
        let options = Bus::<8>::inputs(1).set_signed(Options::new(), -2i8);
        let circuit = Circuit::new(Invert::<8>, options).unwrap();
        circuit.update();
        assert_eq!(Bus::<8>::outputs(1).read_signed(&circuit).unwrap(), 1i8);
    }

    #[test]
    fn read_unknown_port() {
        let circuit = Circuit::new(Invert::<8>, Options::new()).unwrap();
        let err = Bus::<2>::outputs(8).read::<u8>(&circuit).unwrap_err();
        assert!(matches!(err, CircuitError::UnknownPort { ref port, .. } if port == "out9"));
    }
}
