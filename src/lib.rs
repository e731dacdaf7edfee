pub mod circuit_sim;
pub mod components;
pub mod contact;
pub mod design;
pub mod error;
pub mod net;

mod circuit;
pub use circuit::{Circuit, Forced, Options, Ports};
pub use circuit_sim::Simulation;
pub use error::{CircuitError, Result};
