//! Compute module - lattice dynamics and rule search.

mod automaton;
mod particles;

pub mod evolution;

pub use automaton::*;
pub use particles::*;
