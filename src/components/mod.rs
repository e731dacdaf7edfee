//! The standard catalog of designs.
//!
//! Multi-bit designs number their ports least significant bit first.

pub mod adder;
pub mod alu;
pub mod bus;
pub mod compare;
pub mod count;
pub mod gates;
pub mod mux;
pub mod wide;
