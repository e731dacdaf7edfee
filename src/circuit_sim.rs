use tracing::{debug, trace};

use crate::design::Design;
use crate::error::Result;
use crate::{Circuit, Options};

pub type Tick = u64;
pub type Ticks = u64;

/// Ticks [`Simulation::run_default`] runs for.
pub const DEFAULT_TICKS: Ticks = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunResult {
    Finished { after_ticks: Ticks },
    ReachedMaxTicks { max_ticks: Ticks },
}

/// Drives a root circuit tick by tick.
///
/// Evaluation is plain relaxation: every tick updates the whole tree once,
/// with no dependency ordering. A circuit reaches its steady state after
/// [`Circuit::depth`] ticks; running fewer leaves stale outputs behind and
/// nothing reports it.
#[derive(Debug)]
pub struct Simulation {
    circuit: Circuit,
    tick: Tick,
}

impl Simulation {
    pub fn new(circuit: Circuit) -> Self {
        Simulation { circuit, tick: 0 }
    }

    pub fn build<D: Design + 'static>(design: D, options: Options) -> Result<Self> {
        Ok(Self::new(Circuit::new(design, options)?))
    }

    /// Number of ticks run so far.
    pub fn elapsed(&self) -> Tick {
        self.tick
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    pub fn bit(&self, port: &str) -> Option<bool> {
        self.circuit.bit(port)
    }

    pub fn tick(&mut self) {
        trace!(target: "digilogic::sim", tick = self.tick, circuit = self.circuit.name(), "tick");
        self.circuit.update();
        self.tick += 1;
    }

    /// Runs exactly `ticks` ticks.
    pub fn run(&mut self, ticks: Ticks) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn run_default(&mut self) {
        self.run(DEFAULT_TICKS)
    }

    /// Runs as many ticks as the circuit's depth and returns that count.
    /// Runs nothing if the wiring loops.
    pub fn run_to_depth(&mut self) -> Option<Ticks> {
        let depth = self.circuit.depth()?;
        self.run(depth);
        Some(depth)
    }

    /// Ticks until a tick leaves every contact unchanged, at most `max_ticks`
    /// times.
    pub fn settle(&mut self, max_ticks: Ticks) -> RunResult {
        let mut previous = self.circuit.snapshot();
        for ticks in 1..=max_ticks {
            self.tick();
            let current = self.circuit.snapshot();
            if current == previous {
                debug!(target: "digilogic::sim", circuit = self.circuit.name(), ticks, "settled");
                return RunResult::Finished { after_ticks: ticks };
            }
            previous = current;
        }
        debug!(target: "digilogic::sim", circuit = self.circuit.name(), max_ticks, "still changing");
        RunResult::ReachedMaxTicks { max_ticks }
    }
}

#[cfg(test)]
mod test {
    use super::{RunResult, Simulation, DEFAULT_TICKS};
    use crate::components::gates::{Not, Xor};
    use crate::Options;

    #[test]
    fn run_counts_ticks() {
        let mut sim = Simulation::build(Not, Options::new()).unwrap();
        sim.tick();
        sim.run(4);
        assert_eq!(sim.elapsed(), 5);
        sim.run_default();
        assert_eq!(sim.elapsed(), 5 + DEFAULT_TICKS);
        sim.run(0);
        assert_eq!(sim.elapsed(), 5 + DEFAULT_TICKS);
    }

    #[test]
    fn run_to_depth_runs_depth_ticks() {
        let mut sim =
            Simulation::build(Xor, Options::new().input("in1", true).input("in2", false)).unwrap();
        assert_eq!(sim.run_to_depth(), Some(4));
        assert_eq!(sim.elapsed(), 4);
        assert_eq!(sim.bit("out1"), Some(true));
    }

    #[test]
    fn settle_stops_at_fixed_point() {
        let mut sim =
            Simulation::build(Xor, Options::new().input("in1", true).input("in2", true)).unwrap();
        match sim.settle(50) {
            RunResult::Finished { after_ticks } => {
                assert!(after_ticks <= 5, "settled after {after_ticks}");
                assert_eq!(sim.elapsed(), after_ticks);
            }
            other => panic!("did not settle: {other:?}"),
        }
        assert_eq!(sim.bit("out1"), Some(false));
    }

    #[test]
    fn settle_gives_up() {
        let mut sim = Simulation::build(Not, Options::new().input("in1", true)).unwrap();
        assert_eq!(sim.settle(0), RunResult::ReachedMaxTicks { max_ticks: 0 });
        assert_eq!(sim.elapsed(), 0);
    }
}
